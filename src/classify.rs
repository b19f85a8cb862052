//! Filename classification.
//!
//! A file name is tested against an ordered catalog of rules (see
//! [`crate::catalog`]). The first rule whose predicate matches decides the
//! destination name, the destination subdirectory and the labels. Rules never
//! combine and there is no fallthrough: a matching rule that cannot build its
//! destination reports a [`ClassifyError`] instead of handing the name to the
//! next rule.
//!
//! # Examples
//!
//! ```
//! use renfiles::classify::{Classification, ClassificationEngine};
//!
//! let engine = ClassificationEngine::default();
//! let result = engine.classify("NZZS_20230405edition.pdf").unwrap();
//! let dest = result.destination().unwrap();
//! assert_eq!(dest.file_name, "20230405nzzs.pdf");
//! assert_eq!(dest.subdir, "nzzs");
//! assert_eq!(dest.labels, vec!["dNews".to_string()]);
//!
//! assert_eq!(engine.classify("random_notes.txt").unwrap(), Classification::Unrecognized);
//! ```

use crate::catalog::{self, OWNER_ALIASES};
use crate::date::{LeadingDate, extract_leading_date};
use thiserror::Error;
use tracing::debug;

/// Where a recognized file goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// New file name, never empty.
    pub file_name: String,
    /// Subdirectory relative to the destination root. Empty means the root.
    pub subdir: String,
    /// Labels to attach after the move. Empty means no labeling step.
    pub labels: Vec<String>,
}

/// Outcome of classifying one file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// No rule applies; the file is left alone.
    Unrecognized,
    /// A rule applies and produced a destination.
    Matched(Destination),
}

impl Classification {
    pub fn destination(&self) -> Option<&Destination> {
        match self {
            Classification::Matched(dest) => Some(dest),
            Classification::Unrecognized => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Classification::Matched(_))
    }
}

/// A rule matched a name but its destination could not be derived.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// The name is too short for the character range the rule extracts.
    #[error("'{name}' matches rule '{rule}' but is shorter than {needed} characters")]
    NameTooShort {
        rule: &'static str,
        name: String,
        needed: usize,
    },
    /// No 12-character meeting timestamp token was found.
    #[error("'{name}' has no meeting date token")]
    MissingMeetingDate { name: String },
    /// No token resolved to a known owner alias.
    #[error("'{name}' has no known owner token")]
    MissingOwner { name: String },
}

/// How a primary rule derives the destination from the name.
#[derive(Debug, Clone, Copy)]
pub struct Extract {
    /// Character ranges of the name, concatenated in order.
    pub spans: &'static [(usize, usize)],
    /// Literal appended to the concatenated spans.
    pub suffix: &'static str,
    pub subdir: SubdirTemplate,
    pub labels: &'static [&'static str],
}

/// Destination subdirectory of a primary rule.
#[derive(Debug, Clone, Copy)]
pub enum SubdirTemplate {
    Fixed(&'static str),
    /// `<extracted spans>gl`, one directory per meeting.
    Meeting,
}

/// One entry of the ordered rule catalog.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Name starts with `prefix`.
    Prefix {
        prefix: &'static str,
        extract: Extract,
    },
    /// Name ends with `suffix`.
    Suffix {
        suffix: &'static str,
        extract: Extract,
    },
    /// Name starts with `prefix`; owner and meeting date are read from the
    /// `_`-separated tokens of the file stem.
    Token {
        prefix: &'static str,
        suffix: &'static str,
        labels: &'static [&'static str],
    },
    /// Name starts with a leading date; the keyword catalog picks the folder.
    Dated,
}

impl Rule {
    /// Short identifier used in logs and errors.
    pub fn id(&self) -> &'static str {
        match self {
            Rule::Prefix { prefix, .. } => *prefix,
            Rule::Suffix { suffix, .. } => *suffix,
            Rule::Token { prefix, .. } => *prefix,
            Rule::Dated => "leading date",
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            Rule::Prefix { prefix, .. } | Rule::Token { prefix, .. } => name.starts_with(prefix),
            Rule::Suffix { suffix, .. } => name.ends_with(suffix),
            Rule::Dated => extract_leading_date(name).is_some(),
        }
    }

    /// Builds the destination for a name this rule matches.
    pub fn build(&self, name: &str) -> Result<Classification, ClassifyError> {
        let destination = match self {
            Rule::Prefix { extract, .. } | Rule::Suffix { extract, .. } => {
                build_extracted(self.id(), extract, name)?
            }
            Rule::Token {
                suffix, labels, ..
            } => build_meeting_input(name, suffix, labels)?,
            Rule::Dated => match extract_leading_date(name) {
                Some(date) => build_dated(name, &date),
                None => return Ok(Classification::Unrecognized),
            },
        };
        Ok(Classification::Matched(destination))
    }
}

/// Evaluates the rule catalog in priority order.
#[derive(Debug, Clone)]
pub struct ClassificationEngine {
    rules: &'static [Rule],
}

impl Default for ClassificationEngine {
    fn default() -> Self {
        Self::new(catalog::RULES)
    }
}

impl ClassificationEngine {
    pub fn new(rules: &'static [Rule]) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'static [Rule] {
        self.rules
    }

    /// Classifies a file name. The result depends on `name` only.
    pub fn classify(&self, name: &str) -> Result<Classification, ClassifyError> {
        match self.rules.iter().find(|rule| rule.matches(name)) {
            Some(rule) => {
                debug!(name, rule = rule.id(), "rule matched");
                rule.build(name)
            }
            None => {
                debug!(name, "no rule matched");
                Ok(Classification::Unrecognized)
            }
        }
    }
}

/// Characters `start..end` of `name`, or `None` if the name is too short.
fn char_span(name: &str, start: usize, end: usize) -> Option<String> {
    let span: String = name.chars().skip(start).take(end - start).collect();
    (span.chars().count() == end - start).then_some(span)
}

fn owned_labels(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|label| label.to_string()).collect()
}

fn build_extracted(
    rule: &'static str,
    extract: &Extract,
    name: &str,
) -> Result<Destination, ClassifyError> {
    let mut key = String::new();
    for &(start, end) in extract.spans {
        let span = char_span(name, start, end).ok_or_else(|| ClassifyError::NameTooShort {
            rule,
            name: name.to_string(),
            needed: end,
        })?;
        key.push_str(&span);
    }

    let subdir = match extract.subdir {
        SubdirTemplate::Fixed(dir) => dir.to_string(),
        SubdirTemplate::Meeting => format!("{key}gl"),
    };

    Ok(Destination {
        file_name: format!("{key}{}", extract.suffix),
        subdir,
        labels: owned_labels(extract.labels),
    })
}

/// Resolves owner and meeting date from names like
/// `input_gl_ksh_201403101200.pdf`. Later tokens override earlier ones.
fn build_meeting_input(
    name: &str,
    suffix: &str,
    labels: &[&str],
) -> Result<Destination, ClassifyError> {
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    let mut owner: Option<&str> = None;
    let mut meeting_date: Option<String> = None;

    for token in stem.split('_') {
        if let Some(canonical) = resolve_owner(token) {
            owner = Some(canonical);
        } else if token.chars().count() == 12 && token.starts_with('2') {
            meeting_date = Some(token.chars().take(8).collect());
        } else {
            debug!(name, token, "ignoring token");
        }
    }

    let meeting_date = meeting_date.ok_or_else(|| ClassifyError::MissingMeetingDate {
        name: name.to_string(),
    })?;
    let owner = owner.ok_or_else(|| ClassifyError::MissingOwner {
        name: name.to_string(),
    })?;

    Ok(Destination {
        file_name: format!("{meeting_date}{suffix}{owner}.pdf"),
        subdir: format!("{meeting_date}gl"),
        labels: owned_labels(labels),
    })
}

fn resolve_owner(token: &str) -> Option<&'static str> {
    OWNER_ALIASES
        .iter()
        .find(|(alias, _)| token.eq_ignore_ascii_case(alias))
        .map(|&(_, canonical)| canonical)
}

/// Dated names keep their name; the remainder from character 8 selects the
/// folder via the keyword catalog, otherwise the file lands in the root.
fn build_dated(name: &str, date: &LeadingDate) -> Destination {
    debug!(name, date = date.raw(), precision = ?date.precision(), "leading date");
    let remainder: String = name.chars().skip(8).collect();

    let (subdir, labels) = match catalog::KEYWORDS
        .iter()
        .find(|rule| rule.matches(date, &remainder))
    {
        Some(rule) => (rule.subdir(date), owned_labels(rule.labels)),
        None => (String::new(), Vec::new()),
    };

    Destination {
        file_name: name.to_string(),
        subdir,
        labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(name: &str) -> Classification {
        ClassificationEngine::default()
            .classify(name)
            .expect("classification should succeed")
    }

    fn dest(name: &str) -> Destination {
        match classify(name) {
            Classification::Matched(dest) => dest,
            Classification::Unrecognized => panic!("{name} should be recognized"),
        }
    }

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_nzz_am_sonntag() {
        let d = dest("NZZS_20230405edition.pdf");
        assert_eq!(d.file_name, "20230405nzzs.pdf");
        assert_eq!(d.subdir, "nzzs");
        assert_eq!(d.labels, labels(&["dNews"]));
    }

    #[test]
    fn test_newspaper_prefixes() {
        let cases = [
            ("NZZ_20230405.pdf", "20230405nzz.pdf", "nzz"),
            ("20230405_zsr.pdf", "20230405zsz.pdf", "zsz"),
            ("ZH_20230405.pdf", "20230405_20min.pdf", "20min"),
            (
                "taz-ges-2023-04-05.pdf",
                "20230405tagesanzeiger.pdf",
                "tagesanzeiger",
            ),
            (
                "sonze-2023-04-09.pdf",
                "20230409sonntagszeitung.pdf",
                "sonntagszeitung",
            ),
            ("EQUITY_20230401.pdf", "20230401nzzEquity.pdf", "nzzEquity"),
            ("FOLIO_20230401.pdf", "20230401nzzFolio.pdf", "nzzFolio"),
            (
                "GESE_20230401.pdf",
                "20230401nzzGesellschaft.pdf",
                "nzzGesellschaft",
            ),
        ];
        for (name, file_name, subdir) in cases {
            let d = dest(name);
            assert_eq!(d.file_name, file_name, "file name for {name}");
            assert_eq!(d.subdir, subdir, "subdir for {name}");
            assert_eq!(d.labels, labels(&["dNews"]), "labels for {name}");
        }
    }

    #[test]
    fn test_acm_communications() {
        let d = dest("communications201403-dl.pdf");
        assert_eq!(d.file_name, "20140300acmCommunications.pdf");
        assert_eq!(d.subdir, "acmCommunications");
        assert_eq!(d.labels, labels(&["oAcm", "dMagazine", "tTech"]));
    }

    #[test]
    fn test_computerworld() {
        let d = dest("compw-2014-03-07.pdf");
        assert_eq!(d.file_name, "20140307computerworld.pdf");
        assert_eq!(d.subdir, "computerworld");
        assert_eq!(d.labels, labels(&["dNews", "tTech"]));
    }

    #[test]
    fn test_meeting_input() {
        let d = dest("input_gl_KSH_201403101200.pdf");
        assert_eq!(d.file_name, "20140310glinputKornel.pdf");
        assert_eq!(d.subdir, "20140310gl");
        assert_eq!(d.labels, labels(&["oAdnovum", "dMinutes", "lZuerich"]));
    }

    #[test]
    fn test_meeting_input_aliases() {
        let cases = [
            ("toms", "Toms"),
            ("kornel", "Kornel"),
            ("christof", "Christof"),
            ("CDO", "Christof"),
            ("christian", "Christian"),
            ("crw", "Christian"),
            ("Bruno", "Bruno"),
            ("bka", "Bruno"),
        ];
        for (alias, owner) in cases {
            let name = format!("input_gl_{alias}_201403101200.pdf");
            assert_eq!(
                dest(&name).file_name,
                format!("20140310glinput{owner}.pdf"),
                "alias {alias}"
            );
        }
    }

    #[test]
    fn test_meeting_input_last_token_wins() {
        let d = dest("input_gl_bka_201401011200_cdo_201402021200.pdf");
        assert_eq!(d.file_name, "20140202glinputChristof.pdf");
    }

    #[test]
    fn test_meeting_input_missing_parts() {
        let engine = ClassificationEngine::default();
        assert!(matches!(
            engine.classify("input_gl_bka.pdf"),
            Err(ClassifyError::MissingMeetingDate { .. })
        ));
        assert!(matches!(
            engine.classify("input_gl_nobody_201403101200.pdf"),
            Err(ClassifyError::MissingOwner { .. })
        ));
    }

    #[test]
    fn test_weekly_minutes() {
        let d = dest("kw11_minutes_20140310.pdf");
        assert_eq!(d.file_name, "20140310mmgl.pdf");
        assert_eq!(d.subdir, "20140310gl");
        assert_eq!(d.labels, labels(&["oAdnovum", "dMinutes", "lZuerich"]));
    }

    #[test]
    fn test_abstract_is_year_partitioned() {
        let d = dest("20230115abstract_paper.pdf");
        assert_eq!(d.file_name, "20230115abstract_paper.pdf");
        assert_eq!(d.subdir, "abstract/2023");
        assert_eq!(d.labels, labels(&["dAbstract"]));
    }

    #[test]
    fn test_dated_without_keyword_goes_to_root() {
        let d = dest("20230101foobar.pdf");
        assert_eq!(d.file_name, "20230101foobar.pdf");
        assert_eq!(d.subdir, "");
        assert!(d.labels.is_empty());
    }

    /// Remainder after the date, destination folder and labels per keyword.
    const KEYWORD_CASES: &[(&str, &str, &[&str])] = &[
        ("ic_sbb.pdf", "ic/2023", &["dInvoice", "tTravel"]),
        ("rg_swisscom.pdf", "rechnungen/2023", &["dInvoice"]),
        ("zkb_auszug.pdf", "zkb/2023", &["oZkb", "dBank", "tFinance"]),
        (
            "pf_auszug.pdf",
            "postfinance/2023",
            &["oPostfinance", "dBank", "tFinance"],
        ),
        ("lohn.pdf", "lohn/2023", &["dSalary", "tFinance"]),
        (
            "slkk_police.pdf",
            "slkk/2023",
            &["oSlkk", "dInsurance", "tHealth"],
        ),
        ("mmb.pdf", "mmb", &["oMmb", "dMinutes"]),
        ("karte_zuerich.pdf", "karten", &["dCard"]),
        ("diary.pdf", "diary/2023", &["dDiary"]),
        ("abstract_paper.pdf", "abstract/2023", &["dAbstract"]),
        ("kof_bulletin.pdf", "kof", &["oKof", "dNews", "tEconomy"]),
        ("book_rust.pdf", "books", &["dBook"]),
        ("sise.pdf", "sise", &["oSise", "dMagazine", "tTech"]),
        ("awuz.pdf", "awuz", &["oAwuz", "dMinutes"]),
        (
            "informatikSpektrum.pdf",
            "informatikSpektrum",
            &["oGi", "dMagazine", "tTech"],
        ),
        ("rustConf_Pres.PDF", "presentations/2023", &["dPresentation"]),
        ("itc_report.pdf", "itc", &["oItc", "dNews", "tTech"]),
        ("swd_issue.pdf", "swd", &["oSwd", "dMagazine", "tTech"]),
        ("sla_acme.pdf", "contracts/sla", &["dContract", "dSla"]),
        ("nda_acme.pdf", "contracts/nda", &["dContract", "dNda"]),
        ("offer_acme.pdf", "offers/2023", &["dOffer"]),
    ];

    #[test]
    fn test_dated_keywords() {
        assert_eq!(KEYWORD_CASES.len(), catalog::KEYWORDS.len());
        for (rest, subdir, labels) in KEYWORD_CASES {
            for date in ["20230301", "202303xx"] {
                let name = format!("{date}{rest}");
                let d = dest(&name);
                assert_eq!(d.subdir, *subdir, "subdir for {name}");
                assert_eq!(d.file_name, name);
                assert_eq!(d.labels, *labels, "labels for {name}");
            }
        }
    }

    #[test]
    fn test_keywords_other_than_abstract_need_a_month() {
        for (rest, subdir, labels) in KEYWORD_CASES {
            let name = format!("2023xxxx{rest}");
            let d = dest(&name);
            if rest.starts_with("abstract_") {
                assert_eq!(d.subdir, *subdir);
                assert_eq!(d.labels, *labels);
            } else {
                assert_eq!(d.subdir, "", "subdir for {name}");
                assert!(d.labels.is_empty(), "labels for {name}");
            }
        }
    }

    #[test]
    fn test_year_only_date_is_too_coarse_for_keywords() {
        // the keyword sits at character 8, but the date only has year precision
        let d = dest("2023xxxxlohn.pdf");
        assert_eq!(d.subdir, "");
        assert!(d.labels.is_empty());
    }

    #[test]
    fn test_abstract_accepts_year_precision() {
        let d = dest("2023____abstract_x.pdf");
        assert_eq!(d.subdir, "abstract/2023");
    }

    #[test]
    fn test_short_dated_name() {
        let d = dest("2023.pdf");
        assert_eq!(d.subdir, "");
        assert_eq!(d.file_name, "2023.pdf");
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(classify("random_notes.txt"), Classification::Unrecognized);
        assert_eq!(classify(""), Classification::Unrecognized);
        assert_eq!(classify("nzz_lowercase.pdf"), Classification::Unrecognized);
    }

    #[test]
    fn test_priority_prefix_before_suffix() {
        // matches both NZZ_ and _zsr.pdf; NZZ_ is listed first
        let d = dest("NZZ_20230405_zsr.pdf");
        assert_eq!(d.subdir, "nzz");
    }

    #[test]
    fn test_priority_suffix_before_leading_date() {
        let d = dest("20230405_zsr.pdf");
        assert_eq!(d.subdir, "zsz");
    }

    #[test]
    fn test_priority_nzzs_before_nzz() {
        assert_eq!(dest("NZZS_20230405.pdf").subdir, "nzzs");
    }

    #[test]
    fn test_matching_rule_too_short_is_an_error() {
        let result = ClassificationEngine::default().classify("NZZ_23.pdf");
        assert!(matches!(
            result,
            Err(ClassifyError::NameTooShort {
                rule: "NZZ_",
                needed: 12,
                ..
            })
        ));
    }

    #[test]
    fn test_classify_is_deterministic() {
        let engine = ClassificationEngine::default();
        for name in ["NZZS_20230405edition.pdf", "20230101foobar.pdf", "x.pdf"] {
            assert_eq!(engine.classify(name), engine.classify(name));
        }
    }

    #[test]
    fn test_char_span_counts_characters() {
        assert_eq!(char_span("ZH_2023ü405", 3, 11), Some("2023ü405".to_string()));
        assert_eq!(char_span("ZH_2023", 3, 11), None);
    }
}
