//! File headers with typed variable injection.

use std::marker::PhantomData;

/// Trait for template variable sets
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// Template with typed variable injection
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: PhantomData,
        }
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.content)
    }
}

/// Variables shared by both generated files.
pub struct HeaderVars {
    pub pkgname: String,
    /// File name of `<o>data.rs`, as the runtime file `include!`s it.
    pub data_file: String,
}

impl TemplateVars for HeaderVars {
    fn apply(&self, content: &str) -> String {
        content
            .replace("__PKGNAME__", &self.pkgname)
            .replace("__DATA_FILE__", &self.data_file)
    }
}

/// Header of `<o>data.rs`. The file is `include!`d, so no inner attributes.
pub const DATA_HEADER: Template<HeaderVars> = Template::new(
    "// Code generated by bindata. DO NOT EDIT.\n\
     //\n\
     // Asset data for module `__PKGNAME__`, included by its runtime file.\n\n",
);

/// Header of `<o>.rs`.
pub const RUNTIME_HEADER: Template<HeaderVars> = Template::new(
    "// Code generated by bindata. DO NOT EDIT.\n\n\
     //! Embedded assets, mounted as module `__PKGNAME__`.\n\
     //!\n\
     //! Asset bytes live in `__DATA_FILE__`.\n\n\
     #![allow(dead_code, non_upper_case_globals)]\n\n",
);
