//! Closed vocabularies a mock must draw its status, content type and charset from.

pub const CONTENT_TYPES: &[&str] = &[
    "application/json",
    "application/x-www-form-urlencoded",
    "application/xhtml+xml",
    "application/xml",
    "image/jpeg",
    "image/png",
    "image/svg+xml",
    "multipart/form-data",
    "text/css",
    "text/csv",
    "text/html",
    "text/json",
    "text/plain",
    "text/xml",
];

pub const CHARSETS: &[&str] = &["UTF-8", "ISO-8859-1", "UTF-16"];

pub const STATUS_CODES: &[(u16, &str)] = &[
    (100, "Continue"),
    (101, "Switching Protocols"),
    (102, "Processing"),
    (103, "Early Hints"),
    (200, "OK"),
    (201, "Created"),
    (202, "Accepted"),
    (203, "Non-Authoritative Information"),
    (204, "No Content"),
    (205, "Reset Content"),
    (206, "Partial Content"),
    (207, "Multi-Status"),
    (208, "Already Reported"),
    (226, "IM Used"),
    (300, "Multiple Choices"),
    (301, "Moved Permanently"),
    (302, "Found"),
    (303, "See Other"),
    (304, "Not Modified"),
    (305, "Use Proxy"),
    (307, "Temporary Redirect"),
    (308, "Permanent Redirect"),
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (402, "Payment Required"),
    (403, "Forbidden"),
    (404, "Not Found"),
    (405, "Method Not Allowed"),
    (406, "Not Acceptable"),
    (407, "Proxy Authentication Required"),
    (408, "Request Timeout"),
    (409, "Conflict"),
    (410, "Gone"),
    (411, "Length Required"),
    (412, "Precondition Failed"),
    (413, "Request Entity Too Large"),
    (414, "Request URI Too Long"),
    (415, "Unsupported Media Type"),
    (416, "Requested Range Not Satisfiable"),
    (417, "Expectation Failed"),
    (418, "I'm a teapot"),
    (421, "Misdirected Request"),
    (422, "Unprocessable Entity"),
    (423, "Locked"),
    (424, "Failed Dependency"),
    (425, "Too Early"),
    (426, "Upgrade Required"),
    (428, "Precondition Required"),
    (429, "Too Many Requests"),
    (431, "Request Header Fields Too Large"),
    (451, "Unavailable For Legal Reasons"),
    (500, "Internal Server Error"),
    (501, "Not Implemented"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
    (504, "Gateway Timeout"),
    (505, "HTTP Version Not Supported"),
    (506, "Variant Also Negotiates"),
    (507, "Insufficient Storage"),
    (508, "Loop Detected"),
    (510, "Not Extended"),
    (511, "Network Authentication Required"),
];

pub fn is_content_type(value: &str) -> bool {
    CONTENT_TYPES.contains(&value)
}

pub fn is_charset(value: &str) -> bool {
    CHARSETS.contains(&value)
}

pub fn status_reason(code: u16) -> Option<&'static str> {
    STATUS_CODES
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|(_, reason)| *reason)
}

pub fn is_status_code(code: u16) -> bool {
    status_reason(code).is_some()
}

/// Content types whose bodies are human readable.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_are_sorted_and_unique() {
        assert!(STATUS_CODES.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn looks_up_reasons() {
        assert_eq!(status_reason(405), Some("Method Not Allowed"));
        assert_eq!(status_reason(299), None);
    }

    #[test]
    fn membership_is_exact() {
        assert!(is_content_type("text/plain"));
        assert!(!is_content_type("text/plain; charset=UTF-8"));
        assert!(is_charset("ISO-8859-1"));
        assert!(!is_charset("utf-8"));
    }
}
