// literal markers that server-generated index pages are known to carry
pub const SIGNATURES: [&str; 5] = [
    // S3 bucket listing
    "<ListBucketResult",
    // Apache / nginx autoindex
    "Index of",
    // IIS
    "Parent Directory",
    // Tomcat and friends
    "Directory Listing For",
    "<title>Index of",
];

pub const LINK_MARKER: &str = "<a href=";

// more anchors than this on a page without a signature still counts as a listing
pub const LINK_THRESHOLD: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListingMatch {
    Signature(&'static str),
    LinkDensity(usize),
}

impl std::fmt::Display for ListingMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingMatch::Signature(s) => write!(f, "signature '{s}'"),
            ListingMatch::LinkDensity(n) => write!(f, "{n} links"),
        }
    }
}

/// Returns the first rule that marks `body` as a directory listing.
///
/// Signatures are checked before link density; matching is case-sensitive
/// and purely textual.
pub fn matched_signature(body: &str) -> Option<ListingMatch> {
    if let Some(sig) = SIGNATURES.iter().find(|sig| body.contains(**sig)) {
        return Some(ListingMatch::Signature(*sig));
    }
    let links = body.matches(LINK_MARKER).count();
    if links > LINK_THRESHOLD {
        return Some(ListingMatch::LinkDensity(links));
    }
    None
}

pub fn is_directory_listing(body: &str) -> bool {
    matched_signature(body).is_some()
}
