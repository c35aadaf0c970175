//! Value drawing for each placeholder kind.

use crate::modifiers::BRACKET_PAIRS;
use crate::pattern::{KeyboardRow, PhoneticAlphabet, PlaceholderKind};
use crate::random::RandomSource;
use crate::utils::GenerationError;
use crate::wordlist::WordlistProvider;

pub const VOWELS: &str = "eaoiu";

pub const CONSONANTS: &str = "tnshrdlcmfgypwbvkxjqz";

pub const LETTERS: &str = "etaoinshrdlucmfgypwbvkxjqz";

/// Symbols; duplicates make the common ones more likely
pub const SYMBOLS: &[&str] = &[
    "!", "@", "#", "%", "$", "^", "&", "*", "(", ")", "{", "}", ":", "'", "/", "`", "~", "*", "-",
    "<", ">", "+", "=", "_", "|", "\\", "\\", ".", ".", ",", ",", ";", ";", "?", "?", "[", "]",
];

/// Every printable character on a US keyboard except space
pub const KEYBOARD: &str = "1234567890`~!@#$%^&*()-_=+]}[{\\|'\";:/?.>,<abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Sentence endings; duplicates make the common ones more likely
pub const END_PUNCTUATION: &[&str] = &[
    "!", "!", "!", "!", ".", ".", ".", ".", ".", ".", ".", ".", ".", ".", ".", ".", ".", ".", ".",
    "...", "...", "?", "?", "?", "?", "?", "?", "?",
];

pub const SENTENCE_PUNCTUATION: &str = "!;:?.,";

pub const SMILEYS: &[&str] = &[
    ":)", ":(", ":-)", ":-(", ":D", ":0", ";-)", ";)", ":/", "8-)", "8-(", ":-D", ":-0", ":-p",
    ":^)",
];

pub const LEFT_HAND: &str = "qwertasdfgzxcvb";

pub const RIGHT_HAND: &str = "yuiophjknm";

pub const LONG_MONTHS: &[&str] = &[
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const SHORT_MONTHS: &[&str] = &[
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const LONG_DAYS: &[&str] = &[
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const SHORT_DAYS: &[&str] = &["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const NATO_ALPHABET: [&str; 26] = [
    "Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot", "Golf", "Hotel", "India", "Juliet",
    "Kilo", "Lima", "Mike", "November", "Oscar", "Papa", "Quebec", "Romeo", "Sierra", "Tango",
    "Uniform", "Victor", "Whiskey", "X-ray", "Yankee", "Zulu",
];

const RADIO_ALPHABET: [&str; 26] = [
    "Adam", "Baker", "Charles", "David", "Edward", "Frank", "George", "Henry", "Ida", "John",
    "King", "Lincoln", "Mary", "Nora", "Ocean", "Paul", "Queen", "Robert", "Sam", "Tom", "Union",
    "Victor", "William", "X-Ray", "Young", "Zebra",
];

/// Separators for `{numbercode}`; the dash is the usual one
const CODE_DELIMITERS: &[&str] = &[
    "-", "-", "-", "-", "-", "-", "-", "-", ".", ".", ".", ",", "/", "\\", ":",
];

/// The keys of one keyboard row, optionally with its punctuation keys
pub fn row_keys(row: KeyboardRow, full: bool) -> &'static str {
    match (row, full) {
        (KeyboardRow::Number, false) => "1234567890",
        (KeyboardRow::Number, true) => "1234567890`~!@#$%^&*()_-+=",
        (KeyboardRow::Top, false) => "QWERTYUIOP",
        (KeyboardRow::Top, true) => "QWERTYUIOP{[}]|\\",
        (KeyboardRow::Home, false) => "ASDFGHJKL",
        (KeyboardRow::Home, true) => "ASDFGHJKL;:'\"",
        (KeyboardRow::Bottom, false) => "ZXCVBNM",
        (KeyboardRow::Bottom, true) => "ZXCVBNM,<.>/?",
    }
}

/// Keyboard rows used for `{sequence(n)}` walks, top to bottom
const KEYBOARD_ROWS: [&str; 4] = ["1234567890", "qwertyuiop", "asdfghjkl", "zxcvbnm"];

// Building blocks for pronounceable words; repeats act as weights.
const VOWEL_UNITS: &[&str] = &[
    "a", "a", "a", "a", "a", "a", "a", "a", "a", "e", "e", "e", "e", "e", "e", "e", "e", "e", "e",
    "e", "i", "i", "i", "u", "u", "o", "o", "ay", "ea", "ee", "ia", "io", "oa", "oi", "oo", "er",
    "on", "re", "he", "ha", "in", "es", "io", "ou",
];

const CONSONANT_UNITS: &[&str] = &[
    "b", "b", "c", "d", "d", "d", "f", "g", "j", "k", "m", "m", "m", "n", "n", "p", "p", "qu", "r",
    "r", "r", "s", "s", "s", "s", "t", "t", "t", "t", "v", "w", "x", "z", "z", "th", "st", "sh",
    "ph", "ch", "th", "sh", "for", "has", "tis", "men",
];

/// Consonant clusters that never start a word
const INNER_CONSONANT_UNITS: &[&str] = &[
    "nd", "rt", "dd", "zz", "rg", "ng", "tt", "ss", "mm", "nn", "pp", "nt", "nc", "nl", "ft",
];

const VOWEL_SUFFIXES: &[&str] = &[
    "ing", "ers", "ance", "ence", "le", "ness", "ings", "ment", "ize", "ate", "ive", "ute", "acy",
    "ous", "ify", "ought", "some", "edness", "ed", "es", "ly", "less", "ment", "able", "ible",
    "les", "led", "ious", "ant", "ary", "iety", "ist", "ism", "ial", "ate", "act", "ure", "iac",
    "ice", "aint", "ent", "ant", "ure", "ide", "ify", "les",
];

const CONSONANT_SUFFIXES: &[&str] = &[
    "cked", "cker", "tor", "ter", "ly", "rer", "tic", "nst", "lyst", "onic", "ght", "nge", "nce",
    "zer", "cy", "ly", "ny", "lic", "dged", "red", "ate", "ndle", "ching", "tching", "lent", "ged",
    "zen", "ted", "nnial", "lic", "rly", "stic", "se", "les",
];

/// Endings tried after a unit that ends in `t`
const T_SUFFIXES: &[&str] = &["ion", "ity", "ient", "ment", "ance", "ly", "less", "ter", "tor"];

/// Doubled letters that read badly, and what replaces them
const CLEANUP_PAIRS: &[(&str, &str)] = &[
    ("aa", "a"),
    ("hh", "h"),
    ("ii", "i"),
    ("jj", "j"),
    ("kk", "k"),
    ("qq", "qu"),
    ("uu", "u"),
    ("vv", "v"),
    ("ww", "w"),
    ("xx", "x"),
    ("yy", "y"),
];

/// Draw a value for one placeholder kind
pub fn draw<W, R>(kind: &PlaceholderKind, words: &W, rng: &mut R) -> Result<String, GenerationError>
where
    W: WordlistProvider + ?Sized,
    R: RandomSource + ?Sized,
{
    let value = match kind {
        PlaceholderKind::Word { category } => {
            let list = words.words(category.as_deref())?;
            pick(list, rng)?.clone()
        }
        PlaceholderKind::Number { min, max } => {
            if min > max {
                return Err(GenerationError::ExhaustedRange { lo: *min, hi: *max });
            }
            rng.uniform_int(*min, *max).to_string()
        }
        PlaceholderKind::Symbol => pick(SYMBOLS, rng)?.to_string(),
        PlaceholderKind::Letter => pick_char(LETTERS, rng).to_string(),
        PlaceholderKind::Vowel => pick_char(VOWELS, rng).to_string(),
        PlaceholderKind::Consonant => pick_char(CONSONANTS, rng).to_string(),
        PlaceholderKind::Keyboard => pick_char(KEYBOARD, rng).to_string(),
        PlaceholderKind::Space => " ".to_string(),
        PlaceholderKind::Pronounceable => pronounceable(rng),
        PlaceholderKind::Sequence { length } => sequence(*length, rng),
        PlaceholderKind::EndPunctuation => pick_str(END_PUNCTUATION, rng).to_string(),
        PlaceholderKind::SentencePunctuation => pick_char(SENTENCE_PUNCTUATION, rng).to_string(),
        PlaceholderKind::Smiley => pick_str(SMILEYS, rng).to_string(),
        PlaceholderKind::Row { row, full } => pick_char(row_keys(*row, *full), rng).to_string(),
        PlaceholderKind::LeftHand => pick_char(LEFT_HAND, rng).to_string(),
        PlaceholderKind::RightHand => pick_char(RIGHT_HAND, rng).to_string(),
        PlaceholderKind::Ordinal { number } => {
            let number = match number {
                Some(n) => *n,
                None => rng.uniform_int(1, 99),
            };
            ordinal(number)
        }
        PlaceholderKind::Phonetic { text, alphabet } => match text {
            Some(text) => phonetic(text, *alphabet),
            None => phonetic(&pick_char(LETTERS, rng).to_string(), *alphabet),
        },
        PlaceholderKind::NumberPattern { length } => number_pattern(*length, rng),
        PlaceholderKind::NumberCode => number_code(rng),
        PlaceholderKind::Asc { character } => match character {
            Some(c) => u32::from(*c).to_string(),
            None => rng.uniform_int(32, 255).to_string(),
        },
        PlaceholderKind::Chr { code } => char::from(*code).to_string(),
        PlaceholderKind::LongMonth => pick_str(LONG_MONTHS, rng).to_string(),
        PlaceholderKind::ShortMonth => pick_str(SHORT_MONTHS, rng).to_string(),
        PlaceholderKind::LongDay => pick_str(LONG_DAYS, rng).to_string(),
        PlaceholderKind::ShortDay => pick_str(SHORT_DAYS, rng).to_string(),
    };
    Ok(value)
}

fn pick<'a, T, R>(items: &'a [T], rng: &mut R) -> Result<&'a T, GenerationError>
where
    R: RandomSource + ?Sized,
{
    if items.is_empty() {
        return Err(GenerationError::ExhaustedRange { lo: 0, hi: -1 });
    }
    Ok(&items[rng.uniform_choice(items.len())])
}

/// Pick one character from a non-empty ASCII alphabet
fn pick_char<R: RandomSource + ?Sized>(alphabet: &str, rng: &mut R) -> char {
    let bytes = alphabet.as_bytes();
    char::from(bytes[rng.uniform_choice(bytes.len())])
}

fn pick_str<R: RandomSource + ?Sized>(items: &[&'static str], rng: &mut R) -> &'static str {
    items[rng.uniform_choice(items.len())]
}

/// A made-up word built from alternating vowel and consonant units
///
/// Four or five units are drawn; any unit after the first may instead be a
/// word ending, which stops the word.
pub fn pronounceable<R: RandomSource + ?Sized>(rng: &mut R) -> String {
    let mut word = String::new();
    let mut vowel_next = rng.bernoulli(0.5);
    let units = rng.uniform_int(4, 5);

    for _ in 0..units {
        let len = word.len();

        if vowel_next {
            if len > 1 && rng.uniform_choice(4) == 0 {
                word.push_str(pick_str(VOWEL_SUFFIXES, rng));
                break;
            }
            word.push_str(pick_str(VOWEL_UNITS, rng));
        } else {
            if len > 0 && rng.uniform_choice(4) == 0 {
                word.push_str(pick_str(CONSONANT_SUFFIXES, rng));
                break;
            }
            if len > 0 && rng.uniform_choice(4) == 0 {
                word.push_str(pick_str(INNER_CONSONANT_UNITS, rng));
            } else {
                word.push_str(pick_str(CONSONANT_UNITS, rng));
            }
            if word.ends_with('t') && len > 1 && rng.bernoulli(0.5) {
                word.push_str(pick_str(T_SUFFIXES, rng));
                break;
            }
        }

        vowel_next = !vowel_next;
    }

    tidy_pronounceable(word)
}

fn tidy_pronounceable(mut word: String) -> String {
    for (from, to) in CLEANUP_PAIRS {
        if word.contains(from) {
            word = word.replace(from, to);
        }
    }
    // i before e except after c
    if word.contains("cie") {
        word = word.replace("cie", "cei");
    }

    let bytes = word.as_bytes();
    if bytes.len() >= 2 && bytes[0] == bytes[1] {
        word.remove(0);
    }
    word
}

/// `1` -> `1st`, `12` -> `12th`, `22` -> `22nd`
pub fn ordinal(number: i64) -> String {
    let suffix = match (number % 100, number % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    format!("{}{}", number, suffix)
}

/// Spell the letters of `text` with a phonetic alphabet, space separated
///
/// Anything that is not an ASCII letter is skipped.
pub fn phonetic(text: &str, alphabet: PhoneticAlphabet) -> String {
    let table = match alphabet {
        PhoneticAlphabet::Nato => &NATO_ALPHABET,
        PhoneticAlphabet::Radio => &RADIO_ALPHABET,
    };
    text.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| table[usize::from(c.to_ascii_uppercase() as u8 - b'A')])
        .collect::<Vec<_>>()
        .join(" ")
}

/// Digits with the kind of structure people pick by hand
///
/// After a random first digit, each digit is random, a repeat of an earlier
/// digit, or one below or above the previous digit.
pub fn number_pattern<R: RandomSource + ?Sized>(length: usize, rng: &mut R) -> String {
    if length == 0 {
        return String::new();
    }
    let mut digits: Vec<i64> = Vec::with_capacity(length);
    digits.push(rng.uniform_int(0, 9));

    for i in 1..length {
        let previous = digits[i - 1];
        let next = match rng.uniform_int(0, 3) {
            1 => digits[rng.uniform_choice(i)],
            2 if previous > 1 => previous - 1,
            3 if previous < 9 => previous + 1,
            _ => rng.uniform_int(0, 9),
        };
        digits.push(next);
    }
    digits.iter().map(|d| d.to_string()).collect()
}

/// A short code such as `12-2`, `4.44` or `(73)1`
pub fn number_code<R: RandomSource + ?Sized>(rng: &mut R) -> String {
    let repeated = rng.uniform_int(0, 9).to_string();
    let delimiter = pick_str(CODE_DELIMITERS, rng);
    let mut code = String::new();

    loop {
        let digit = rng.uniform_int(0, 9).to_string();
        loop {
            code.push_str(&digit);
            if rng.bernoulli(0.3) {
                code.push_str(&repeated);
            } else if rng.bernoulli(0.4) {
                code.push_str(delimiter);
            }
            if code.len() > 2 || !rng.bernoulli(0.3) {
                break;
            }
        }

        if code.len() as i64 > rng.uniform_int(3, 4) {
            break;
        }
        if rng.bernoulli(0.1) {
            let (open, close) = BRACKET_PAIRS[rng.uniform_choice(BRACKET_PAIRS.len())];
            code = format!("{}{}{}", open, code, close);
        }
        if rng.bernoulli(0.15) && code.len() > 2 {
            break;
        }
    }

    code.trim_end_matches(|c: char| !c.is_ascii_digit()).to_string()
}

/// Keys next to `(row, col)`: left, right, and the same column one row up or down
fn neighbours(row: usize, col: usize) -> Vec<(usize, usize)> {
    let mut keys = Vec::with_capacity(4);
    if col > 0 {
        keys.push((row, col - 1));
    }
    if col + 1 < KEYBOARD_ROWS[row].len() {
        keys.push((row, col + 1));
    }
    if row > 0 && col < KEYBOARD_ROWS[row - 1].len() {
        keys.push((row - 1, col));
    }
    if row + 1 < KEYBOARD_ROWS.len() && col < KEYBOARD_ROWS[row + 1].len() {
        keys.push((row + 1, col));
    }
    keys
}

fn key(row: usize, col: usize) -> char {
    char::from(KEYBOARD_ROWS[row].as_bytes()[col])
}

/// A walk of `length` physically adjacent keys
///
/// The start key is uniform over the whole keyboard; each step moves to a
/// uniformly chosen neighbour of the current key.
pub fn sequence<R: RandomSource + ?Sized>(length: usize, rng: &mut R) -> String {
    if length == 0 {
        return String::new();
    }

    let total: usize = KEYBOARD_ROWS.iter().map(|row| row.len()).sum();
    let mut index = rng.uniform_choice(total);
    let mut row = 0;
    while index >= KEYBOARD_ROWS[row].len() {
        index -= KEYBOARD_ROWS[row].len();
        row += 1;
    }
    let mut col = index;

    let mut walk = String::with_capacity(length);
    walk.push(key(row, col));
    for _ in 1..length {
        let options = neighbours(row, col);
        (row, col) = options[rng.uniform_choice(options.len())];
        walk.push(key(row, col));
    }
    walk
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RngSource;
    use crate::wordlist::Wordlists;

    fn position(c: char) -> (usize, usize) {
        KEYBOARD_ROWS
            .iter()
            .enumerate()
            .find_map(|(row, keys)| keys.find(c).map(|col| (row, col)))
            .unwrap()
    }

    #[test]
    fn test_number_in_range() {
        let words = Wordlists::builtin();
        let mut rng = RngSource::seeded(1);
        let kind = PlaceholderKind::Number { min: 100, max: 999 };
        for _ in 0..1000 {
            let n: i64 = draw(&kind, &words, &mut rng).unwrap().parse().unwrap();
            assert!((100..=999).contains(&n));
        }
    }

    #[test]
    fn test_inverted_range() {
        let words = Wordlists::builtin();
        let mut rng = RngSource::seeded(1);
        let kind = PlaceholderKind::Number { min: 5, max: 1 };
        assert_eq!(
            draw(&kind, &words, &mut rng),
            Err(GenerationError::ExhaustedRange { lo: 5, hi: 1 })
        );
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_word_draws_from_category() {
        let mut words = Wordlists::new();
        words.insert("animal", ["horse", "otter"]);
        let mut rng = RngSource::seeded(2);
        let kind = PlaceholderKind::Word {
            category: Some("animal".to_string()),
        };
        for _ in 0..20 {
            let word = draw(&kind, &words, &mut rng).unwrap();
            assert!(word == "horse" || word == "otter");
        }

        let missing = PlaceholderKind::Word {
            category: Some("color".to_string()),
        };
        assert!(matches!(
            draw(&missing, &words, &mut rng),
            Err(GenerationError::UnknownWordlist { .. })
        ));
    }

    #[test]
    fn test_single_character_kinds() {
        let words = Wordlists::builtin();
        let mut rng = RngSource::seeded(3);
        for _ in 0..200 {
            let v = draw(&PlaceholderKind::Vowel, &words, &mut rng).unwrap();
            assert!(VOWELS.contains(&v));
            let c = draw(&PlaceholderKind::Consonant, &words, &mut rng).unwrap();
            assert!(CONSONANTS.contains(&c));
            let l = draw(&PlaceholderKind::Letter, &words, &mut rng).unwrap();
            assert!(LETTERS.contains(&l));
            let k = draw(&PlaceholderKind::Keyboard, &words, &mut rng).unwrap();
            assert!(KEYBOARD.contains(&k));
            let s = draw(&PlaceholderKind::Symbol, &words, &mut rng).unwrap();
            assert!(SYMBOLS.contains(&s.as_str()));
        }
    }

    #[test]
    fn test_space_draws_nothing() {
        let words = Wordlists::builtin();
        let mut rng = RngSource::seeded(4);
        assert_eq!(draw(&PlaceholderKind::Space, &words, &mut rng).unwrap(), " ");
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_pronounceable_shape() {
        let mut rng = RngSource::seeded(5);
        for _ in 0..500 {
            let word = pronounceable(&mut rng);
            assert!(word.len() >= 2, "too short: {:?}", word);
            assert!(word.chars().all(|c| c.is_ascii_lowercase()));
            assert!(!word.contains("aa") && !word.contains("cie"));
            let bytes = word.as_bytes();
            assert_ne!(bytes[0], bytes[1], "leading double letter in {:?}", word);
        }
    }

    #[test]
    fn test_tidy_pronounceable() {
        assert_eq!(tidy_pronounceable("baaqqcie".to_string()), "baqucei");
        assert_eq!(tidy_pronounceable("ssat".to_string()), "sat");
    }

    #[test]
    fn test_sequence_walks_adjacent_keys() {
        let mut rng = RngSource::seeded(6);
        for length in 1..12 {
            let walk = sequence(length, &mut rng);
            assert_eq!(walk.chars().count(), length);

            let keys: Vec<(usize, usize)> = walk.chars().map(position).collect();
            for pair in keys.windows(2) {
                assert!(
                    neighbours(pair[0].0, pair[0].1).contains(&pair[1]),
                    "{:?} is not a keyboard walk",
                    walk
                );
            }
        }
    }

    #[test]
    fn test_sequence_draw_count() {
        let mut rng = RngSource::seeded(7);
        sequence(5, &mut rng);
        assert_eq!(rng.draws(), 5);
    }

    #[test]
    fn test_list_kinds() {
        let words = Wordlists::builtin();
        let mut rng = RngSource::seeded(8);
        let cases: [(PlaceholderKind, &[&str]); 6] = [
            (PlaceholderKind::EndPunctuation, END_PUNCTUATION),
            (PlaceholderKind::Smiley, SMILEYS),
            (PlaceholderKind::LongMonth, LONG_MONTHS),
            (PlaceholderKind::ShortMonth, SHORT_MONTHS),
            (PlaceholderKind::LongDay, LONG_DAYS),
            (PlaceholderKind::ShortDay, SHORT_DAYS),
        ];
        for (kind, list) in cases {
            for _ in 0..50 {
                let value = draw(&kind, &words, &mut rng).unwrap();
                assert!(list.contains(&value.as_str()), "{} gave {:?}", kind.name(), value);
            }
        }
    }

    #[test]
    fn test_character_set_kinds() {
        let words = Wordlists::builtin();
        let mut rng = RngSource::seeded(9);
        let cases = [
            (PlaceholderKind::SentencePunctuation, SENTENCE_PUNCTUATION),
            (PlaceholderKind::LeftHand, LEFT_HAND),
            (PlaceholderKind::RightHand, RIGHT_HAND),
            (
                PlaceholderKind::Row {
                    row: KeyboardRow::Number,
                    full: false,
                },
                "1234567890",
            ),
            (
                PlaceholderKind::Row {
                    row: KeyboardRow::Bottom,
                    full: true,
                },
                "ZXCVBNM,<.>/?",
            ),
        ];
        for (kind, keys) in cases {
            for _ in 0..50 {
                let value = draw(&kind, &words, &mut rng).unwrap();
                assert_eq!(value.chars().count(), 1);
                assert!(keys.contains(&value), "{} gave {:?}", kind.name(), value);
            }
        }
        assert_eq!(rng.draws(), 250);
    }

    #[test]
    fn test_row_keys() {
        for row in [
            KeyboardRow::Number,
            KeyboardRow::Top,
            KeyboardRow::Home,
            KeyboardRow::Bottom,
        ] {
            assert!(row_keys(row, true).starts_with(row_keys(row, false)));
        }
        assert_eq!(row_keys(KeyboardRow::Home, false), "ASDFGHJKL");
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(112), "112th");
        assert_eq!(ordinal(0), "0th");

        let words = Wordlists::builtin();
        let mut rng = RngSource::seeded(10);
        let fixed = PlaceholderKind::Ordinal { number: Some(22) };
        assert_eq!(draw(&fixed, &words, &mut rng).unwrap(), "22nd");
        assert_eq!(rng.draws(), 0);

        let random = PlaceholderKind::Ordinal { number: None };
        for _ in 0..100 {
            let value = draw(&random, &words, &mut rng).unwrap();
            let n: i64 = value.trim_end_matches(char::is_alphabetic).parse().unwrap();
            assert!((1..=99).contains(&n));
            assert_eq!(value, ordinal(n));
        }
    }

    #[test]
    fn test_phonetic() {
        assert_eq!(phonetic("abc", PhoneticAlphabet::Nato), "Alpha Bravo Charlie");
        assert_eq!(phonetic("Xy1z", PhoneticAlphabet::Nato), "X-ray Yankee Zulu");
        assert_eq!(phonetic("dog", PhoneticAlphabet::Radio), "David Ocean George");
        assert_eq!(phonetic("42", PhoneticAlphabet::Radio), "");

        let words = Wordlists::builtin();
        let mut rng = RngSource::seeded(11);
        let kind = PlaceholderKind::Phonetic {
            text: None,
            alphabet: PhoneticAlphabet::Nato,
        };
        for _ in 0..50 {
            let value = draw(&kind, &words, &mut rng).unwrap();
            assert!(NATO_ALPHABET.contains(&value.as_str()), "{:?}", value);
        }
    }

    #[test]
    fn test_number_pattern() {
        let mut rng = RngSource::seeded(12);
        for length in 1..10 {
            let value = number_pattern(length, &mut rng);
            assert_eq!(value.len(), length);
            assert!(value.bytes().all(|b| b.is_ascii_digit()));
        }
        assert_eq!(number_pattern(0, &mut rng), "");
    }

    #[test]
    fn test_number_code() {
        let mut rng = RngSource::seeded(13);
        for _ in 0..500 {
            let code = number_code(&mut rng);
            assert!(!code.is_empty());
            assert!(code.ends_with(|c: char| c.is_ascii_digit()), "{:?}", code);
            assert!(code.chars().filter(char::is_ascii_digit).count() >= 1);
        }
    }

    #[test]
    fn test_character_codes() {
        let words = Wordlists::builtin();
        let mut rng = RngSource::seeded(14);
        let asc = PlaceholderKind::Asc {
            character: Some('A'),
        };
        assert_eq!(draw(&asc, &words, &mut rng).unwrap(), "65");
        let chr = PlaceholderKind::Chr { code: 126 };
        assert_eq!(draw(&chr, &words, &mut rng).unwrap(), "~");
        assert_eq!(rng.draws(), 0);

        let any = PlaceholderKind::Asc { character: None };
        for _ in 0..100 {
            let code: i64 = draw(&any, &words, &mut rng).unwrap().parse().unwrap();
            assert!((32..=255).contains(&code));
        }
    }

    #[test]
    fn test_neighbours_at_edges() {
        // `p` has nothing to its right and no key below it
        assert_eq!(neighbours(1, 9), vec![(1, 8), (0, 9)]);
        assert_eq!(neighbours(3, 0), vec![(3, 1), (2, 0)]);
    }
}
