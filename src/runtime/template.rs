use percent_encoding::percent_decode_str;
use std::fmt;
use std::io::{self, Cursor, Write};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tiny_http::{Header, Request, Response, StatusCode};

/// One embedded file.
#[derive(Clone, Copy)]
pub struct AssetFile {
    data: fn() -> &'static [u8],
    zip: fn() -> &'static [u8],
    size: u64,
    zip_size: u64,
    time: i64,
}

impl AssetFile {
    /// Original bytes.
    pub fn data(&self) -> &'static [u8] {
        (self.data)()
    }

    /// gzip bytes, or the original bytes when no compressed form is stored.
    pub fn zip_data(&self) -> &'static [u8] {
        (self.zip)()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// 0 when no compressed form is stored.
    pub fn zip_size(&self) -> u64 {
        self.zip_size
    }

    pub fn is_compressed(&self) -> bool {
        self.zip_size > 0
    }

    /// Modification time in seconds since the Unix epoch.
    pub fn mtime(&self) -> i64 {
        self.time
    }

    pub fn mod_time(&self) -> SystemTime {
        if self.time >= 0 {
            UNIX_EPOCH + Duration::from_secs(self.time as u64)
        } else {
            UNIX_EPOCH - Duration::from_secs(self.time.unsigned_abs())
        }
    }
}

impl fmt::Debug for AssetFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetFile")
            .field("size", &self.size)
            .field("zip_size", &self.zip_size)
            .field("time", &self.time)
            .finish()
    }
}

/// The requested name is not in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFound(pub String);

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} not found", self.0)
    }
}

impl std::error::Error for NotFound {}

/// Table of embedded files, sorted by name.
#[derive(Debug, Clone, Copy)]
pub struct AssetFs {
    entries: &'static [(&'static str, AssetFile)],
}

impl AssetFs {
    /// `entries` must be sorted by name.
    pub const fn new(entries: &'static [(&'static str, AssetFile)]) -> Self {
        Self { entries }
    }

    pub fn open(&self, name: &str) -> Result<&'static AssetFile, NotFound> {
        let entries = self.entries;
        match entries.binary_search_by(|(key, _)| (*key).cmp(name)) {
            Ok(i) => Ok(&entries[i].1),
            Err(_) => Err(NotFound(name.to_string())),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decide the HTTP response for `name` from the two request headers
    /// that matter.
    pub fn reply(
        &self,
        name: &str,
        if_modified_since: Option<&str>,
        accept_encoding: Option<&str>,
    ) -> Reply {
        let file = match self.open(name) {
            Ok(file) => file,
            Err(_) => return Reply::not_found(),
        };

        if let Some(since) = if_modified_since.and_then(parse_http_date) {
            if file.time < since + 1 {
                return Reply {
                    status: 304,
                    headers: Vec::new(),
                    body: b"",
                };
            }
        }

        let mut headers = vec![
            ("Content-Type", mime_type(name).to_string()),
            ("Last-Modified", http_date(file.time)),
        ];

        let gzip = accept_encoding.is_some_and(|v| v.contains("gzip")) && file.is_compressed();
        let body = if gzip {
            headers.push(("Content-Encoding", "gzip".to_string()));
            headers.push(("Content-Length", file.zip_size.to_string()));
            file.zip_data()
        } else {
            headers.push(("Content-Length", file.size.to_string()));
            file.data()
        };

        Reply {
            status: 200,
            headers,
            body,
        }
    }

    /// Bind this table to `prefix` as an [`AssetHandler`].
    pub fn handler(self, prefix: &str) -> AssetHandler {
        AssetHandler {
            fs: self,
            prefix: prefix.to_string(),
        }
    }

    /// Answer a tiny_http request for `prefix + <url path>`.
    pub fn serve(&self, prefix: &str, request: Request) -> io::Result<()> {
        let name = format!("{}{}", prefix, url_path(request.url()));
        let reply = self.reply(
            &name,
            header(&request, "If-Modified-Since").as_deref(),
            header(&request, "Accept-Encoding").as_deref(),
        );
        if reply.status == 304 {
            // tiny_http always adds Content-Length or Transfer-Encoding to a
            // Response; a 304 carries neither.
            let mut writer = request.into_writer();
            writer.write_all(b"HTTP/1.1 304 Not Modified\r\n\r\n")?;
            return writer.flush();
        }
        request.respond(reply.into_response())
    }
}

/// A response decided by [`AssetFs::reply`], before it touches the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: &'static [u8],
}

impl Reply {
    fn not_found() -> Self {
        Reply {
            status: 404,
            headers: vec![("Content-Type", "text/plain; charset=utf-8".to_string())],
            body: b"404 page not found\n",
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn into_response(self) -> Response<Cursor<&'static [u8]>> {
        let headers = self
            .headers
            .iter()
            .filter(|(key, _)| !key.eq_ignore_ascii_case("Content-Length"))
            .filter_map(|(key, value)| Header::from_bytes(key.as_bytes(), value.as_bytes()).ok())
            .collect();
        Response::new(
            StatusCode(self.status),
            headers,
            Cursor::new(self.body),
            Some(self.body.len()),
            None,
        )
    }
}

/// Look `name` up in the generated table.
pub fn open(name: &str) -> Result<&'static AssetFile, NotFound> {
    BINDATA.open(name)
}

/// Original bytes of `name`.
pub fn asset(name: &str) -> Result<&'static [u8], NotFound> {
    BINDATA.open(name).map(AssetFile::data)
}

/// gzip bytes of `name`, or the original bytes when no compressed form is
/// stored.
pub fn asset_zip(name: &str) -> Result<&'static [u8], NotFound> {
    BINDATA.open(name).map(AssetFile::zip_data)
}

/// Request handler serving the generated table under `prefix`.
///
/// ```ignore
/// let handler = serve_assets("static");
/// for request in server.incoming_requests() {
///     handler.handle(request)?;
/// }
/// ```
pub fn serve_assets(prefix: &str) -> AssetHandler {
    BINDATA.handler(prefix)
}

/// An [`AssetFs`] bound to a name prefix, ready to answer requests.
#[derive(Debug, Clone)]
pub struct AssetHandler {
    fs: AssetFs,
    prefix: String,
}

impl AssetHandler {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn handle(&self, request: Request) -> io::Result<()> {
        self.fs.serve(&self.prefix, request)
    }
}

fn header(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
        .map(|h| h.value.to_string())
}

/// Path component of a request URL: query dropped, percent-escapes decoded.
pub fn url_path(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or("");
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

const WEEKDAYS: [&str; 7] = ["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Format seconds since the epoch as an IMF-fixdate, e.g.
/// `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn http_date(secs: i64) -> String {
    let days = secs.div_euclid(86_400);
    let rem = secs.rem_euclid(86_400);
    let (year, month, day) = civil_from_days(days);
    format!(
        "{}, {:02} {} {:04} {:02}:{:02}:{:02} GMT",
        WEEKDAYS[days.rem_euclid(7) as usize],
        day,
        MONTHS[(month - 1) as usize],
        year,
        rem / 3600,
        rem / 60 % 60,
        rem % 60
    )
}

/// Parse an IMF-fixdate back into seconds since the epoch.
///
/// The weekday must be a valid name but need not match the date.
pub fn parse_http_date(text: &str) -> Option<i64> {
    let b = text.as_bytes();
    if b.len() != 29 || &b[3..5] != b", " || &b[25..] != b" GMT" {
        return None;
    }
    if b[7] != b' ' || b[11] != b' ' || b[16] != b' ' || b[19] != b':' || b[22] != b':' {
        return None;
    }
    if !WEEKDAYS.iter().any(|w| w.as_bytes() == &b[0..3]) {
        return None;
    }
    let month = MONTHS.iter().position(|m| m.as_bytes() == &b[8..11])? as i64 + 1;
    let day = digits(&b[5..7])?;
    let year = digits(&b[12..16])?;
    let (hour, minute, second) = (digits(&b[17..19])?, digits(&b[20..22])?, digits(&b[23..25])?);
    if day < 1 || day > days_in_month(year, month) || hour > 23 || minute > 59 || second > 59 {
        return None;
    }
    let days = days_from_civil(year, month, day);
    Some(days * 86_400 + hour * 3600 + minute * 60 + second)
}

fn digits(b: &[u8]) -> Option<i64> {
    b.iter().try_fold(0i64, |acc, &c| {
        if c.is_ascii_digit() {
            Some(acc * 10 + i64::from(c - b'0'))
        } else {
            None
        }
    })
}

fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) => 29,
        2 => 28,
        _ => 0,
    }
}

// Proleptic Gregorian calendar <-> days since 1970-01-01.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Content type for the extension of `name`; empty when unknown.
pub fn mime_type(name: &str) -> &'static str {
    let ext = match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.to_ascii_lowercase(),
        None => return "",
    };
    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" | "cjs" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "map" => "application/json",
        "xml" => "text/xml; charset=utf-8",
        "txt" => "text/plain; charset=utf-8",
        "md" => "text/markdown; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",
        "yaml" | "yml" => "text/yaml; charset=utf-8",
        "toml" => "text/toml; charset=utf-8",
        "rss" => "application/rss+xml",
        "atom" => "application/atom+xml",
        "webmanifest" => "application/manifest+json",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "ico" => "image/x-icon",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" | "oga" => "audio/ogg",
        "flac" => "audio/flac",
        "aac" | "m4a" => "audio/aac",
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "mov" => "video/quicktime",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",
        "pdf" => "application/pdf",
        "wasm" => "application/wasm",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        _ => "",
    }
}
