//! Name matching for profile claims.
//!
//! A signed-in user may claim a placeholder profile only when their name
//! plausibly refers to the same person. Rules, applied in order after
//! normalization (trim, collapse inner whitespace, lowercase):
//! 1. first and last names equal: match
//! 2. last names differ: no match
//! 3. one first name is a prefix of the other ("Alex" / "Alexander"): match
//! 4. the first names are in a common nickname class ("Bill" / "William"): match

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Embedded nickname equivalence classes. A name may appear in more than one
/// class; its equivalents are the union of its classes.
const NICKNAME_CLASSES: &[&[&str]] = &[
    &["william", "will", "bill", "billy", "willy", "liam"],
    &["robert", "rob", "bob", "bobby", "robbie", "bert"],
    &["richard", "rick", "ricky", "rich", "dick"],
    &["james", "jim", "jimmy", "jamie"],
    &["john", "jack", "johnny"],
    &["jonathan", "jon", "jonny", "nathan"],
    &["michael", "mike", "mikey", "mick"],
    &["thomas", "tom", "tommy"],
    &["joseph", "joe", "joey"],
    &["charles", "charlie", "chuck", "chaz"],
    &["edward", "ed", "eddie", "ted", "ned"],
    &["theodore", "ted", "teddy", "theo"],
    &["alexander", "alex", "xander", "sasha"],
    &["alexandra", "alex", "lexi", "sasha"],
    &["daniel", "dan", "danny"],
    &["david", "dave", "davey"],
    &["matthew", "matt", "matty"],
    &["christopher", "chris", "topher", "kit"],
    &["christina", "chris", "tina", "chrissy"],
    &["nicholas", "nick", "nicky", "colin"],
    &["benjamin", "ben", "benny", "benji"],
    &["samuel", "sam", "sammy"],
    &["samantha", "sam", "sammy"],
    &["steven", "steve", "stevie"],
    &["stephen", "steve", "stevie"],
    &["anthony", "tony"],
    &["andrew", "andy", "drew"],
    &["joshua", "josh"],
    &["zachary", "zach", "zack"],
    &["gregory", "greg"],
    &["timothy", "tim", "timmy"],
    &["kenneth", "ken", "kenny"],
    &["ronald", "ron", "ronnie"],
    &["lawrence", "larry"],
    &["henry", "hank", "harry", "hal"],
    &["harold", "harry", "hal"],
    &["francis", "frank", "frankie"],
    &["frederick", "fred", "freddie"],
    &["peter", "pete"],
    &["raymond", "ray"],
    &["elizabeth", "liz", "beth", "betty", "eliza", "lizzie", "libby", "betsy"],
    &["katherine", "kate", "katie", "kathy", "kat", "kit"],
    &["catherine", "cathy", "cate", "kate", "katie"],
    &["margaret", "maggie", "meg", "peggy", "marge", "greta"],
    &["patricia", "pat", "patty", "trish", "tricia"],
    &["patrick", "pat", "paddy"],
    &["jennifer", "jen", "jenny"],
    &["jessica", "jess", "jessie"],
    &["susan", "sue", "susie"],
    &["deborah", "deb", "debbie"],
    &["rebecca", "becca", "becky"],
    &["victoria", "vicky", "tori"],
    &["abigail", "abby", "gail"],
    &["barbara", "barb", "babs"],
    &["dorothy", "dot", "dottie"],
    &["eleanor", "ellie", "nell", "nora"],
    &["josephine", "jo", "josie"],
    &["kimberly", "kim"],
    &["pamela", "pam"],
    &["cynthia", "cindy"],
    &["judith", "judy"],
    &["allison", "ally", "allie"],
];

/// Immutable bidirectional nickname lookup.
///
/// Built once; every lookup returns the full set of names equivalent to the
/// input, whether the input is a canonical name or a variant.
#[derive(Debug, Clone, Default)]
pub struct NicknameTable {
    equivalents: HashMap<String, HashSet<String>>,
}

lazy_static::lazy_static! {
    static ref BUILTIN_NICKNAMES: Arc<NicknameTable> =
        Arc::new(NicknameTable::from_classes(NICKNAME_CLASSES));
}

impl NicknameTable {
    /// Builds a table from equivalence classes.
    pub fn from_classes<S: AsRef<str>>(classes: &[&[S]]) -> Self {
        let mut equivalents: HashMap<String, HashSet<String>> = HashMap::new();

        for class in classes {
            let names: Vec<String> = class
                .iter()
                .map(|n| normalize_name(n.as_ref()))
                .filter(|n| !n.is_empty())
                .collect();

            for name in &names {
                let entry = equivalents.entry(name.clone()).or_default();
                entry.extend(names.iter().filter(|other| *other != name).cloned());
            }
        }

        Self { equivalents }
    }

    /// The shared table built from the embedded classes.
    pub fn builtin() -> Arc<NicknameTable> {
        Arc::clone(&BUILTIN_NICKNAMES)
    }

    /// Every other name equivalent to `name`.
    pub fn equivalents(&self, name: &str) -> Option<&HashSet<String>> {
        self.equivalents.get(&normalize_name(name))
    }

    /// Whether `a` and `b` share a nickname class.
    pub fn are_equivalent(&self, a: &str, b: &str) -> bool {
        self.equivalents(a)
            .map(|set| set.contains(&normalize_name(b)))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.equivalents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equivalents.is_empty()
    }
}

/// Which rule produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameMatch {
    Exact,
    Prefix,
    Nickname,
}

/// Pure name comparison for claim eligibility.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    nicknames: Arc<NicknameTable>,
}

impl Default for NameMatcher {
    fn default() -> Self {
        Self::new(NicknameTable::builtin())
    }
}

impl NameMatcher {
    pub fn new(nicknames: Arc<NicknameTable>) -> Self {
        Self { nicknames }
    }

    /// Whether the claiming name may claim the candidate name.
    pub fn matches(
        &self,
        claiming_first: &str,
        claiming_last: &str,
        candidate_first: &str,
        candidate_last: &str,
    ) -> bool {
        self.match_kind(claiming_first, claiming_last, candidate_first, candidate_last)
            .is_some()
    }

    /// Like [`matches`](Self::matches), reporting which rule applied.
    pub fn match_kind(
        &self,
        claiming_first: &str,
        claiming_last: &str,
        candidate_first: &str,
        candidate_last: &str,
    ) -> Option<NameMatch> {
        let claiming_first = normalize_name(claiming_first);
        let claiming_last = normalize_name(claiming_last);
        let candidate_first = normalize_name(candidate_first);
        let candidate_last = normalize_name(candidate_last);

        if claiming_first == candidate_first && claiming_last == candidate_last {
            return Some(NameMatch::Exact);
        }

        if claiming_last != candidate_last {
            return None;
        }

        if !claiming_first.is_empty()
            && !candidate_first.is_empty()
            && (claiming_first.starts_with(&candidate_first)
                || candidate_first.starts_with(&claiming_first))
        {
            return Some(NameMatch::Prefix);
        }

        if self
            .nicknames
            .equivalents(&claiming_first)
            .is_some_and(|names| names.contains(&candidate_first))
        {
            return Some(NameMatch::Nickname);
        }

        None
    }
}

/// Trims, collapses inner whitespace and lowercases a name.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
