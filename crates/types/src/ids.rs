//! Typed identifiers for pages and charts.
//!
//! Page and chart directories are named `p<N>` and `chart<N>`. These newtypes
//! are the only place that naming convention is parsed, so the rest of the
//! workspace deals in numbers instead of ad-hoc string matching.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static PAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^p(\d+)$").expect("BUG: invalid PAGE_RE regex literal"));

static CHART_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^chart(\d+)$").expect("BUG: invalid CHART_RE regex literal"));

/// Error returned when a directory name does not follow the naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidName {
    pub kind: &'static str,
    pub name: String,
}

impl fmt::Display for InvalidName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a valid {} name", self.name, self.kind)
    }
}

impl std::error::Error for InvalidName {}

fn parse_number(re: &Regex, name: &str) -> Option<u32> {
    re.captures(name)?.get(1)?.as_str().parse().ok()
}

/// A page (slide) directory, `p<N>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PageId(u32);

impl PageId {
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    /// Parses a directory name such as `p10`. Returns `None` for anything else.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        parse_number(&PAGE_RE, name).map(Self)
    }

    pub fn number(&self) -> u32 {
        self.0
    }

    /// The directory name for this page.
    pub fn dir_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

impl FromStr for PageId {
    type Err = InvalidName;

    /// Accepts either the directory form (`p10`) or a bare number (`10`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(id) = Self::from_dir_name(s) {
            return Ok(id);
        }
        s.parse::<u32>().map(Self).map_err(|_| InvalidName {
            kind: "page",
            name: s.to_string(),
        })
    }
}

impl From<PageId> for String {
    fn from(id: PageId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for PageId {
    type Error = InvalidName;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// A chart directory inside a page, `chart<N>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ChartId(u32);

impl ChartId {
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    /// Parses a directory name such as `chart8`. Returns `None` for anything else.
    pub fn from_dir_name(name: &str) -> Option<Self> {
        parse_number(&CHART_RE, name).map(Self)
    }

    pub fn number(&self) -> u32 {
        self.0
    }

    pub fn dir_name(&self) -> String {
        self.to_string()
    }

    /// The chart part inside the template package, e.g. `chart8.xml`.
    pub fn xml_file_name(&self) -> String {
        format!("chart{}.xml", self.0)
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chart{}", self.0)
    }
}

impl FromStr for ChartId {
    type Err = InvalidName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dir_name(s.trim()).ok_or_else(|| InvalidName {
            kind: "chart",
            name: s.to_string(),
        })
    }
}

impl From<ChartId> for String {
    fn from(id: ChartId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for ChartId {
    type Error = InvalidName;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_id_parsing() {
        assert_eq!(PageId::from_dir_name("p10"), Some(PageId::new(10)));
        assert_eq!(PageId::from_dir_name("p10_old"), None);
        assert_eq!(PageId::from_dir_name("page10"), None);
        assert_eq!(PageId::from_dir_name("p"), None);

        assert_eq!("p3".parse::<PageId>().unwrap(), PageId::new(3));
        assert_eq!("3".parse::<PageId>().unwrap(), PageId::new(3));
        assert!("x3".parse::<PageId>().is_err());
    }

    #[test]
    fn test_chart_id_parsing() {
        let id = ChartId::from_dir_name("chart8").unwrap();
        assert_eq!(id.number(), 8);
        assert_eq!(id.dir_name(), "chart8");
        assert_eq!(id.xml_file_name(), "chart8.xml");

        assert_eq!(ChartId::from_dir_name("chartX"), None);
        assert_eq!(ChartId::from_dir_name("chart8.xml"), None);
        assert!("8".parse::<ChartId>().is_err());
    }

    #[test]
    fn test_ids_serialize_as_dir_names() {
        let json = serde_json::to_string(&(PageId::new(4), ChartId::new(12))).unwrap();
        assert_eq!(json, r#"["p4","chart12"]"#);

        let back: (PageId, ChartId) = serde_json::from_str(&json).unwrap();
        assert_eq!(back, (PageId::new(4), ChartId::new(12)));
    }

    #[test]
    fn test_ordering_is_numeric() {
        let mut pages = vec![PageId::new(10), PageId::new(2), PageId::new(1)];
        pages.sort();
        assert_eq!(pages, vec![PageId::new(1), PageId::new(2), PageId::new(10)]);
    }
}
