//! The modifier pipeline.
//!
//! Each [`Modifier`] maps a string to a string. Most are pure; the ones for
//! which [`Modifier::is_random`] holds draw from the random source. A
//! placeholder's modifiers run left to right, each consuming the previous
//! output, and a modifier with its own qualifier only runs when its roll
//! succeeds.

use crate::pattern::{Modifier, ModifierStep};
use crate::random::RandomSource;
use crate::utils::GenerationError;

/// Case-insensitive character substitutions used by `obscure`
const OBSCURE_TABLE: &[(char, char)] = &[
    ('a', '4'),
    ('b', '8'),
    ('e', '3'),
    ('g', '6'),
    ('i', '1'),
    ('l', '1'),
    ('o', '0'),
    ('s', '5'),
    ('t', '7'),
    ('z', '2'),
];

const VOWELS: &str = "aeiou";

const UNITS: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

/// Names of each group of three digits, least significant first
const SCALES: [&str; 12] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
    "sextillion",
    "septillion",
    "octillion",
    "nonillion",
    "decillion",
];

/// Largest value `romannumeral` will spell out
const MAX_ROMAN: u64 = 3999;

/// Open and close marks used when wrapping a value in random brackets
pub const BRACKET_PAIRS: &[(&str, &str)] = &[
    ("[", "]"),
    ("<", ">"),
    ("(", ")"),
    ("(", ")"),
    ("(", ")"),
    ("(", ")"),
    ("(", ")"),
    ("(", ")"),
    ("(", ")"),
    ("(", ")"),
    ("[", "]"),
    ("[", "]"),
    ("|", "|"),
    ("\\", "/"),
    ("*", "*"),
    ("[", "]"),
    ("{", "}"),
    ("/", "/"),
    ("\\", "/"),
    ("/", "\\"),
    ("\\", "\\"),
    ("<-", "->"),
    ("->", "<-"),
];

/// The result of a modifier chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modified {
    /// What backreferences to this node see
    pub value: String,
    /// Set by `hide`: the value is bound but not written out
    pub hidden: bool,
}

impl Modified {
    pub fn new(value: String) -> Self {
        Modified {
            value,
            hidden: false,
        }
    }

    /// The text this node contributes to the password
    pub fn output(&self) -> &str {
        if self.hidden { "" } else { &self.value }
    }
}

impl Modifier {
    /// Apply this modifier to `input`
    pub fn apply<R: RandomSource + ?Sized>(
        &self,
        input: &str,
        rng: &mut R,
    ) -> Result<String, GenerationError> {
        let output = match self {
            Modifier::Uppercase => input.to_uppercase(),
            Modifier::Lowercase => input.to_lowercase(),
            Modifier::Propercase => propercase(input),
            Modifier::Sentencecase => sentencecase(input),
            Modifier::Titlecase => map_words(input, propercase),
            Modifier::Randomcase => randomcase(input, rng),
            Modifier::Obscure => obscure(input),
            Modifier::Reverse => input.chars().rev().collect(),
            Modifier::Bracket => format!("[{}]", input),
            Modifier::BracketWith(pairs) if pairs.is_empty() => input.to_string(),
            Modifier::BracketWith(pairs) => {
                let (open, close) = &pairs[rng.uniform_choice(pairs.len())];
                format!("{}{}{}", open, input, close)
            }
            Modifier::Piglatin => map_words(input, piglatin_word),
            Modifier::Scramble => scramble(input, rng),
            Modifier::Num2Words => num2words(input)?,
            Modifier::Article => article(input),
            Modifier::Quote => format!("\"{}\"", input),
            Modifier::Hide => String::new(),
            Modifier::Swap => swap_initials(input),
            Modifier::RomanNumeral => roman_numeral(input)?,
            Modifier::Trim => input.trim().to_string(),
            Modifier::Stutter => stutter(input, rng),
            Modifier::Random => random_modifier(input, rng)?,
            Modifier::Replace { from, to } => input.replace(from.as_str(), to),
            Modifier::Format { width } => format!("{:0>width$}", input, width = *width),
            Modifier::Repeat(times) => input.repeat(times + 1),
            Modifier::Left(n) => input.chars().take(*n).collect(),
            Modifier::Right(n) => {
                let len = input.chars().count();
                input.chars().skip(len.saturating_sub(*n)).collect()
            }
            Modifier::Mid { start, len } => input
                .chars()
                .skip(start.saturating_sub(1))
                .take(*len)
                .collect(),
        };
        Ok(output)
    }
}

/// Run a modifier chain over `input` in order
///
/// A step with an uncertain qualifier costs one coin flip and is skipped on
/// tails. `hide` marks the result hidden and leaves the value alone, so later
/// steps and backreferences still see it.
pub fn apply_steps<R: RandomSource + ?Sized>(
    steps: &[ModifierStep],
    input: String,
    rng: &mut R,
) -> Result<Modified, GenerationError> {
    let mut result = Modified::new(input);

    for step in steps {
        if let Some(q) = step.qualifier {
            if !q.is_certain() && !rng.bernoulli(q.probability()) {
                continue;
            }
        }
        match &step.modifier {
            Modifier::Hide => result.hidden = true,
            modifier => result.value = modifier.apply(&result.value, rng)?,
        }
    }
    Ok(result)
}

/// Uppercase the first character and lowercase the rest
pub fn propercase(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
    }
}

/// Uppercase the first letter and lowercase everything else
fn sentencecase(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut capitalized = false;
    for c in input.chars() {
        if !capitalized && c.is_alphabetic() {
            output.extend(c.to_uppercase());
            capitalized = true;
        } else {
            output.extend(c.to_lowercase());
        }
    }
    output
}

/// Apply `f` to every whitespace-delimited word, keeping the whitespace
fn map_words(input: &str, f: fn(&str) -> String) -> String {
    let mut output = String::with_capacity(input.len());
    let mut word = String::new();

    for c in input.chars() {
        if c.is_whitespace() {
            if !word.is_empty() {
                output.push_str(&f(&word));
                word.clear();
            }
            output.push(c);
        } else {
            word.push(c);
        }
    }
    if !word.is_empty() {
        output.push_str(&f(&word));
    }
    output
}

/// One coin flip per character: heads uppercase, tails lowercase
fn randomcase<R: RandomSource + ?Sized>(input: &str, rng: &mut R) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        if rng.bernoulli(0.5) {
            output.extend(c.to_uppercase());
        } else {
            output.extend(c.to_lowercase());
        }
    }
    output
}

fn obscure(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            let lower = c.to_ascii_lowercase();
            OBSCURE_TABLE
                .iter()
                .find(|(from, _)| *from == lower)
                .map_or(c, |(_, to)| *to)
        })
        .collect()
}

fn is_vowel(c: char) -> bool {
    VOWELS.contains(c.to_ascii_lowercase())
}

/// `hello` -> `ellohay`, `apple` -> `appleway`, `Hello` -> `Ellohay`
fn piglatin_word(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    let first = chars[0];
    if !first.is_alphabetic() {
        return word.to_string();
    }
    if is_vowel(first) {
        return format!("{}way", word);
    }

    let split = chars.iter().position(|c| is_vowel(*c)).unwrap_or(chars.len());
    let mut converted: String = chars[split..].iter().chain(&chars[..split]).collect();
    converted.push_str("ay");

    if first.is_uppercase() {
        propercase(&converted)
    } else {
        converted
    }
}

/// Fisher-Yates shuffle of every character
fn scramble<R: RandomSource + ?Sized>(input: &str, rng: &mut R) -> String {
    let mut chars: Vec<char> = input.chars().collect();
    for i in (1..chars.len()).rev() {
        let j = rng.uniform_choice(i + 1);
        chars.swap(i, j);
    }
    chars.into_iter().collect()
}

/// `hello` -> `he-he-hello` style repetition of the first syllable
///
/// The syllable ends at the first vowel, or usually at the first of a wider
/// set of soft consonants. Input with no such letter is returned unchanged.
fn stutter<R: RandomSource + ?Sized>(input: &str, rng: &mut R) -> String {
    let markers = if rng.bernoulli(0.8) {
        "aeiou"
    } else {
        "hywrtnaeiou"
    };

    let Some((end, c)) = input
        .char_indices()
        .find(|(_, c)| markers.contains(c.to_ascii_lowercase()))
    else {
        return input.to_string();
    };

    let mut syllable = input[..end + c.len_utf8()].to_string();
    if rng.bernoulli(0.05) {
        syllable.push_str("...");
    }
    if rng.bernoulli(0.1) {
        syllable.push(' ');
    }

    let times = rng.uniform_int(1, 4) as usize;
    let mut output = syllable.repeat(times);
    output.push_str(input);
    output
}

/// Apply one modifier drawn from a fixed set
///
/// `num2words` is only a candidate when the input is all digits.
fn random_modifier<R: RandomSource + ?Sized>(
    input: &str,
    rng: &mut R,
) -> Result<String, GenerationError> {
    let numeric = !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit());
    let candidates: Vec<Modifier> = [
        Modifier::Bracket,
        Modifier::Num2Words,
        Modifier::Randomcase,
        Modifier::Reverse,
        Modifier::Obscure,
        Modifier::Piglatin,
        Modifier::Scramble,
        Modifier::Swap,
    ]
    .into_iter()
    .filter(|m| numeric || *m != Modifier::Num2Words)
    .collect();

    let chosen = &candidates[rng.uniform_choice(candidates.len())];
    tracing::trace!(modifier = chosen.name(), "random modifier");
    chosen.apply(input, rng)
}

fn article(input: &str) -> String {
    match input.chars().next() {
        None => String::new(),
        Some(c) if is_vowel(c) => format!("an {}", input),
        Some(_) => format!("a {}", input),
    }
}

/// Swap the first letters of the first two words
fn swap_initials(input: &str) -> String {
    let mut words: Vec<String> = input.split(' ').map(str::to_string).collect();
    if words.len() < 2 || words[0].is_empty() || words[1].is_empty() {
        return input.to_string();
    }

    let mut first: Vec<char> = words[0].chars().collect();
    let mut second: Vec<char> = words[1].chars().collect();
    std::mem::swap(&mut first[0], &mut second[0]);
    words[0] = first.into_iter().collect();
    words[1] = second.into_iter().collect();
    words.join(" ")
}

fn require_digits(modifier: Modifier, input: &str) -> Result<(), GenerationError> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GenerationError::NotNumeric {
            modifier: modifier.name().to_string(),
            input: input.to_string(),
        });
    }
    Ok(())
}

/// Spell a string of digits as an English cardinal in sentence case
///
/// Uses the British "and" before the final tens and units:
/// `123` -> `One hundred and twenty three`.
pub fn num2words(input: &str) -> Result<String, GenerationError> {
    require_digits(Modifier::Num2Words, input)?;

    let digits = input.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(propercase(UNITS[0]));
    }

    let groups: Vec<u32> = digits
        .as_bytes()
        .rchunks(3)
        .map(|chunk| chunk.iter().fold(0, |acc, b| acc * 10 + u32::from(b - b'0')))
        .collect();
    if groups.len() > SCALES.len() {
        return Err(GenerationError::NumberTooLarge {
            input: input.to_string(),
        });
    }

    let mut words: Vec<&str> = Vec::new();
    for (scale, group) in groups.iter().enumerate().rev() {
        if *group == 0 {
            continue;
        }
        let hundreds = group / 100;
        let rest = group % 100;

        if hundreds > 0 {
            words.push(UNITS[hundreds as usize]);
            words.push("hundred");
        }
        if rest > 0 {
            if scale == 0 && !words.is_empty() {
                words.push("and");
            }
            if rest < 20 {
                words.push(UNITS[rest as usize]);
            } else {
                words.push(TENS[(rest / 10) as usize]);
                if rest % 10 > 0 {
                    words.push(UNITS[(rest % 10) as usize]);
                }
            }
        }
        if scale > 0 {
            words.push(SCALES[scale]);
        }
    }

    Ok(propercase(&words.join(" ")))
}

/// Roman numerals for a string of digits; zero is the empty string
pub fn roman_numeral(input: &str) -> Result<String, GenerationError> {
    require_digits(Modifier::RomanNumeral, input)?;

    let too_large = || GenerationError::NumberTooLarge {
        input: input.to_string(),
    };
    let mut value: u64 = input.parse().map_err(|_| too_large())?;
    if value > MAX_ROMAN {
        return Err(too_large());
    }

    const NUMERALS: [(u64, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut output = String::new();
    for (amount, numeral) in NUMERALS {
        while value >= amount {
            output.push_str(numeral);
            value -= amount;
        }
    }
    Ok(output)
}
