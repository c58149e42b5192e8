//! Static nickname tables.
//!
//! Read-only data built once per process. Keys and values are lowercase.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Formal first name → common nicknames.
const FORMAL_NICKNAMES: &[(&str, &[&str])] = &[
    ("abigail", &["abby", "abbie", "gail"]),
    ("alexander", &["alex", "xander", "sasha", "al"]),
    ("alexandra", &["alex", "lexi", "sandra", "sasha"]),
    ("andrew", &["andy", "drew"]),
    ("anthony", &["tony", "ant"]),
    ("benjamin", &["ben", "benji", "benny"]),
    ("catherine", &["cathy", "cat", "kate", "katie"]),
    ("charles", &["charlie", "chuck", "chaz"]),
    ("charlotte", &["charlie", "lottie"]),
    ("christopher", &["chris", "topher", "kit"]),
    ("daniel", &["dan", "danny"]),
    ("david", &["dave", "davey"]),
    ("deborah", &["deb", "debbie"]),
    ("dominic", &["dom", "nick"]),
    ("edward", &["ed", "eddie", "ted", "ned"]),
    ("elizabeth", &["liz", "lizzie", "beth", "betsy", "eliza", "libby"]),
    ("emily", &["em", "emmy"]),
    ("frances", &["fran", "frankie"]),
    ("francis", &["frank", "frankie"]),
    ("gabriel", &["gabe"]),
    ("gabrielle", &["gabby", "elle"]),
    ("gregory", &["greg"]),
    ("henry", &["hank", "harry", "hal"]),
    ("isabella", &["bella", "izzy", "isa"]),
    ("jacob", &["jake", "jay"]),
    ("james", &["jim", "jimmy", "jamie"]),
    ("jennifer", &["jen", "jenny"]),
    ("jessica", &["jess", "jessie"]),
    ("john", &["jack", "johnny"]),
    ("jonathan", &["jon", "jonny"]),
    ("joseph", &["joe", "joey"]),
    ("joshua", &["josh"]),
    ("katherine", &["kate", "katie", "kathy", "kat"]),
    ("kimberly", &["kim"]),
    ("lawrence", &["larry"]),
    ("madeline", &["maddie", "maddy"]),
    ("margaret", &["maggie", "meg", "peggy", "marge"]),
    ("matthew", &["matt", "matty"]),
    ("michael", &["mike", "mikey", "mick"]),
    ("nathaniel", &["nate", "nat", "nathan"]),
    ("nicholas", &["nick", "nicky", "nico"]),
    ("olivia", &["liv", "livvy"]),
    ("patricia", &["pat", "patty", "trish"]),
    ("patrick", &["pat", "paddy"]),
    ("rebecca", &["becca", "becky"]),
    ("richard", &["rick", "ricky", "rich", "dick"]),
    ("robert", &["rob", "bob", "bobby", "robbie", "bert"]),
    ("samantha", &["sam", "sammy"]),
    ("samuel", &["sam", "sammy"]),
    ("stephanie", &["steph"]),
    ("stephen", &["steve", "stevie"]),
    ("steven", &["steve", "stevie"]),
    ("susan", &["sue", "susie"]),
    ("theodore", &["theo", "ted", "teddy"]),
    ("thomas", &["tom", "tommy"]),
    ("timothy", &["tim", "timmy"]),
    ("victoria", &["vicky", "tori"]),
    ("william", &["will", "bill", "billy", "willy", "liam"]),
    ("zachary", &["zach", "zack"]),
];

/// Lowercase words that are also names. A roster hit on one of these is
/// ignored when the text writes it entirely in lowercase ("will" the verb,
/// not "Will" the student).
pub const COMMON_WORD_NAMES: &[&str] = &[
    "will", "bill", "bob", "rob", "pat", "art", "ray", "joy", "may", "mark", "nick", "jack",
    "dick", "frank", "grace", "hope", "faith", "gene", "jean", "sue", "dawn", "don", "drew",
    "dean", "grant", "wade", "chase", "chance", "clay", "cliff", "dale", "glen", "lane", "miles",
    "pierce", "reed", "sterling", "troy", "ward", "kit", "hal", "cat", "sam", "al", "ed", "em",
];

static FORMAL_TO_NICKNAMES: LazyLock<HashMap<&'static str, &'static [&'static str]>> =
    LazyLock::new(|| FORMAL_NICKNAMES.iter().copied().collect());

static NICKNAME_TO_FORMAL: LazyLock<HashMap<&'static str, Vec<&'static str>>> =
    LazyLock::new(|| {
        let mut map: HashMap<&'static str, Vec<&'static str>> = HashMap::new();
        for &(formal, nicknames) in FORMAL_NICKNAMES {
            for &nickname in nicknames {
                map.entry(nickname).or_default().push(formal);
            }
        }
        map
    });

/// Nicknames for a formal first name, if it is one.
pub fn nicknames_for(first_name: &str) -> &'static [&'static str] {
    FORMAL_TO_NICKNAMES
        .get(first_name.to_lowercase().as_str())
        .copied()
        .unwrap_or(&[])
}

/// Formal names a nickname may stand for, if it is one.
pub fn formal_names_for(nickname: &str) -> &'static [&'static str] {
    NICKNAME_TO_FORMAL
        .get(nickname.to_lowercase().as_str())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub fn is_common_word_name(word: &str) -> bool {
    let lower = word.to_lowercase();
    COMMON_WORD_NAMES.contains(&lower.as_str())
}
