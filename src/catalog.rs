//! The fixed rule catalog.
//!
//! Order is significant: [`RULES`] is evaluated top to bottom and the first
//! match wins, and [`KEYWORDS`] is searched the same way for names that start
//! with a leading date. Specific prefixes come before the generic date rule
//! because some dated names also start with a literal prefix.

use crate::classify::{Extract, Rule, SubdirTemplate};
use crate::date::LeadingDate;
use KeywordSubdir::{ByYear, Fixed};

const NEWS: &[&str] = &["dNews"];
const MINUTES: &[&str] = &["oAdnovum", "dMinutes", "lZuerich"];

/// Newspaper editions named `<prefix><YYYYMMDD>...`.
const fn edition(
    prefix: &'static str,
    spans: &'static [(usize, usize)],
    suffix: &'static str,
    subdir: &'static str,
    labels: &'static [&'static str],
) -> Rule {
    Rule::Prefix {
        prefix,
        extract: Extract {
            spans,
            suffix,
            subdir: SubdirTemplate::Fixed(subdir),
            labels,
        },
    }
}

/// Primary rules in priority order.
pub static RULES: &[Rule] = &[
    edition("NZZS_", &[(5, 13)], "nzzs.pdf", "nzzs", NEWS),
    edition("NZZ_", &[(4, 12)], "nzz.pdf", "nzz", NEWS),
    Rule::Suffix {
        suffix: "_zsr.pdf",
        extract: Extract {
            spans: &[(0, 8)],
            suffix: "zsz.pdf",
            subdir: SubdirTemplate::Fixed("zsz"),
            labels: NEWS,
        },
    },
    edition("ZH_", &[(3, 11)], "_20min.pdf", "20min", NEWS),
    edition(
        "taz-ges-",
        &[(8, 12), (13, 15), (16, 18)],
        "tagesanzeiger.pdf",
        "tagesanzeiger",
        NEWS,
    ),
    edition(
        "sonze-",
        &[(6, 10), (11, 13), (14, 16)],
        "sonntagszeitung.pdf",
        "sonntagszeitung",
        NEWS,
    ),
    edition("EQUITY_", &[(7, 15)], "nzzEquity.pdf", "nzzEquity", NEWS),
    edition("FOLIO_", &[(6, 14)], "nzzFolio.pdf", "nzzFolio", NEWS),
    edition(
        "GESE_",
        &[(5, 13)],
        "nzzGesellschaft.pdf",
        "nzzGesellschaft",
        NEWS,
    ),
    edition(
        "communications",
        &[(14, 20)],
        "00acmCommunications.pdf",
        "acmCommunications",
        &["oAcm", "dMagazine", "tTech"],
    ),
    edition(
        "compw-",
        &[(6, 10), (11, 13), (14, 16)],
        "computerworld.pdf",
        "computerworld",
        &["dNews", "tTech"],
    ),
    Rule::Token {
        prefix: "input_gl",
        suffix: "glinput",
        labels: MINUTES,
    },
    Rule::Prefix {
        prefix: "kw",
        extract: Extract {
            spans: &[(13, 21)],
            suffix: "mmgl.pdf",
            subdir: SubdirTemplate::Meeting,
            labels: MINUTES,
        },
    },
    Rule::Dated,
];

/// Case-insensitive owner aliases for meeting input files.
pub static OWNER_ALIASES: &[(&str, &str)] = &[
    ("toms", "Toms"),
    ("kornel", "Kornel"),
    ("ksh", "Kornel"),
    ("christof", "Christof"),
    ("cdo", "Christof"),
    ("christian", "Christian"),
    ("crw", "Christian"),
    ("bruno", "Bruno"),
    ("bka", "Bruno"),
];

/// Test applied to the part of a dated name after character 8.
#[derive(Debug, Clone, Copy)]
pub enum KeywordTest {
    Prefix(&'static str),
    /// Compared against the lowercased remainder.
    SuffixIgnoreCase(&'static str),
}

impl KeywordTest {
    pub fn matches(&self, remainder: &str) -> bool {
        match self {
            KeywordTest::Prefix(prefix) => remainder.starts_with(prefix),
            KeywordTest::SuffixIgnoreCase(suffix) => remainder.to_lowercase().ends_with(suffix),
        }
    }
}

/// Folder of a dated document.
#[derive(Debug, Clone, Copy)]
pub enum KeywordSubdir {
    Fixed(&'static str),
    /// `<dir>/<year>`
    ByYear(&'static str),
}

/// One entry of the dated keyword catalog.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub test: KeywordTest,
    /// Minimum length of the leading date (4, 6 or 8).
    pub min_date_len: usize,
    pub subdir: KeywordSubdir,
    pub labels: &'static [&'static str],
}

impl KeywordRule {
    pub fn matches(&self, date: &LeadingDate, remainder: &str) -> bool {
        date.len() >= self.min_date_len && self.test.matches(remainder)
    }

    pub fn subdir(&self, date: &LeadingDate) -> String {
        match self.subdir {
            KeywordSubdir::Fixed(dir) => dir.to_string(),
            KeywordSubdir::ByYear(dir) => format!("{dir}/{}", date.year()),
        }
    }
}

const fn keyword(
    prefix: &'static str,
    subdir: KeywordSubdir,
    labels: &'static [&'static str],
) -> KeywordRule {
    KeywordRule {
        test: KeywordTest::Prefix(prefix),
        min_date_len: 6,
        subdir,
        labels,
    }
}

/// Keywords for dated documents in priority order.
pub static KEYWORDS: &[KeywordRule] = &[
    keyword("ic", ByYear("ic"), &["dInvoice", "tTravel"]),
    keyword("rg", ByYear("rechnungen"), &["dInvoice"]),
    keyword("zkb", ByYear("zkb"), &["oZkb", "dBank", "tFinance"]),
    keyword(
        "pf",
        ByYear("postfinance"),
        &["oPostfinance", "dBank", "tFinance"],
    ),
    keyword("lohn", ByYear("lohn"), &["dSalary", "tFinance"]),
    keyword("slkk", ByYear("slkk"), &["oSlkk", "dInsurance", "tHealth"]),
    keyword("mmb", Fixed("mmb"), &["oMmb", "dMinutes"]),
    keyword("karte", Fixed("karten"), &["dCard"]),
    keyword("diary", ByYear("diary"), &["dDiary"]),
    KeywordRule {
        test: KeywordTest::Prefix("abstract_"),
        min_date_len: 4,
        subdir: ByYear("abstract"),
        labels: &["dAbstract"],
    },
    keyword("kof", Fixed("kof"), &["oKof", "dNews", "tEconomy"]),
    keyword("book", Fixed("books"), &["dBook"]),
    keyword("sise", Fixed("sise"), &["oSise", "dMagazine", "tTech"]),
    keyword("awuz", Fixed("awuz"), &["oAwuz", "dMinutes"]),
    keyword(
        "informatikSpektrum",
        Fixed("informatikSpektrum"),
        &["oGi", "dMagazine", "tTech"],
    ),
    KeywordRule {
        test: KeywordTest::SuffixIgnoreCase("pres.pdf"),
        min_date_len: 6,
        subdir: ByYear("presentations"),
        labels: &["dPresentation"],
    },
    keyword("itc", Fixed("itc"), &["oItc", "dNews", "tTech"]),
    keyword("swd", Fixed("swd"), &["oSwd", "dMagazine", "tTech"]),
    keyword("sla", Fixed("contracts/sla"), &["dContract", "dSla"]),
    keyword("nda", Fixed("contracts/nda"), &["dContract", "dNda"]),
    keyword("offer", ByYear("offers"), &["dOffer"]),
];
