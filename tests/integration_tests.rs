use pafwert::{
    GenerationError, Generator, GeneratorConfig, PafwertError, PatternLibrary, RandomSource,
    RngSource, SyntaxError, Wordlists, compile, generate,
};
use pretty_assertions::assert_eq;
use std::collections::VecDeque;
use std::fs;

/// A random draw as seen by the fake source
#[derive(Debug, Clone, PartialEq)]
enum Draw {
    Int(i64, i64),
    Choice(usize),
    Coin(f64),
}

/// Replays scripted answers and records every call
///
/// When a script runs dry it answers `lo`, `0` and `true`.
#[derive(Default)]
struct ScriptedRng {
    ints: VecDeque<i64>,
    choices: VecDeque<usize>,
    coins: VecDeque<bool>,
    log: Vec<Draw>,
}

impl ScriptedRng {
    fn new() -> Self {
        ScriptedRng::default()
    }

    fn ints(mut self, values: &[i64]) -> Self {
        self.ints.extend(values);
        self
    }

    fn choices(mut self, values: &[usize]) -> Self {
        self.choices.extend(values);
        self
    }

    fn coins(mut self, values: &[bool]) -> Self {
        self.coins.extend(values);
        self
    }
}

impl RandomSource for ScriptedRng {
    fn uniform_int(&mut self, lo: i64, hi: i64) -> i64 {
        self.log.push(Draw::Int(lo, hi));
        self.ints.pop_front().unwrap_or(lo)
    }

    fn uniform_choice(&mut self, n: usize) -> usize {
        self.log.push(Draw::Choice(n));
        self.choices.pop_front().unwrap_or(0) % n
    }

    fn bernoulli(&mut self, p: f64) -> bool {
        self.log.push(Draw::Coin(p));
        self.coins.pop_front().unwrap_or(true)
    }
}

fn animal_words() -> Wordlists {
    let mut words = Wordlists::new();
    words.insert("default", ["horse", "otter", "badger"]);
    words.insert("color", ["teal", "amber"]);
    words
}

#[test]
fn test_load_wordlists_and_patterns_from_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("default.txt"), "kite\nlamp\n").unwrap();
    fs::write(dir.path().join("Color.txt"), "# colors\nteal\n").unwrap();
    let patterns_file = dir.path().join("patterns.cfg");
    fs::write(
        &patterns_file,
        "# test patterns\npair: {word}-{word(color)}\n{word+uppercase}{number(7,7)}\n",
    )
    .unwrap();

    let words = Wordlists::from_dir(dir.path()).unwrap();
    let library = PatternLibrary::from_file(&patterns_file).unwrap();
    assert_eq!(library.len(), 2);

    let mut rng = RngSource::seeded(3);
    let pair = generate(library.get("pair").unwrap(), &words, &mut rng).unwrap();
    assert!(pair == "kite-teal" || pair == "lamp-teal", "got {}", pair);

    let shout = generate(&library.entries()[1].pattern, &words, &mut rng).unwrap();
    assert!(shout == "KITE7" || shout == "LAMP7", "got {}", shout);
}

#[test]
fn test_compile_is_idempotent() {
    let text = "{word(color)+propercase}{\"-\"|\".\"}{number(10,99)[75]}{$W1+reverse}";
    assert_eq!(compile(text).unwrap(), compile(text).unwrap());
}

#[test]
fn test_seeded_generation_is_deterministic() {
    let words = animal_words();
    let pattern =
        compile("{word+randomcase}{symbol|letter|vowel}{number(0,9999)}{pronounceable}{sequence(5)[50]}")
            .unwrap();

    let run = |seed| {
        let mut rng = RngSource::seeded(seed);
        (0..20)
            .map(|_| generate(&pattern, &words, &mut rng).unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(run(42), run(42));
    assert_ne!(run(42), run(43));
}

#[test]
fn test_zero_and_full_qualifiers() {
    let words = animal_words();
    let never = compile("{word[0]}").unwrap();
    let always = compile("{word[100]}").unwrap();
    let mut rng = RngSource::seeded(10);

    for _ in 0..10_000 {
        assert_eq!(generate(&never, &words, &mut rng).unwrap(), "");
        assert!(!generate(&always, &words, &mut rng).unwrap().is_empty());
    }
}

#[test]
fn test_qualifier_draws_one_coin() {
    let words = animal_words();
    let pattern = compile("{word[25]}!").unwrap();

    let mut rng = ScriptedRng::new().coins(&[false]);
    assert_eq!(generate(&pattern, &words, &mut rng).unwrap(), "!");
    assert_eq!(rng.log, vec![Draw::Coin(0.25)]);

    let mut rng = ScriptedRng::new().coins(&[true]).choices(&[2]);
    assert_eq!(generate(&pattern, &words, &mut rng).unwrap(), "badger!");
    assert_eq!(rng.log, vec![Draw::Coin(0.25), Draw::Choice(3)]);
}

#[test]
fn test_number_range() {
    let words = animal_words();
    let pattern = compile("{number(100,999)}").unwrap();
    let mut rng = RngSource::seeded(5);
    let (mut min, mut max) = (i64::MAX, i64::MIN);

    for _ in 0..10_000 {
        let n: i64 = generate(&pattern, &words, &mut rng).unwrap().parse().unwrap();
        assert!((100..=999).contains(&n), "{} out of range", n);
        min = min.min(n);
        max = max.max(n);
    }
    assert!(min <= 105, "smallest value {} never got near 100", min);
    assert!(max >= 994, "largest value {} never got near 999", max);
}

#[test]
fn test_selection_yields_exactly_one_kind() {
    let words = animal_words();
    let pattern = compile("{word|number|symbol}").unwrap();
    let mut rng = RngSource::seeded(6);
    let mut kinds = [0usize; 3];

    for _ in 0..1_000 {
        let out = generate(&pattern, &words, &mut rng).unwrap();
        if ["horse", "otter", "badger"].contains(&out.as_str()) {
            kinds[0] += 1;
        } else if out.len() == 1 && out.chars().all(|c| c.is_ascii_digit()) {
            kinds[1] += 1;
        } else if pafwert::placeholders::SYMBOLS.contains(&out.as_str()) {
            kinds[2] += 1;
        } else {
            panic!("unexpected output {:?}", out);
        }
    }
    assert!(kinds.iter().all(|count| *count > 0), "{:?}", kinds);
}

#[test]
fn test_backreference_repeats_value() {
    let words = animal_words();
    let pattern = compile("{number(9)}{$W1}{$W1}").unwrap();
    let mut rng = RngSource::seeded(7);

    for _ in 0..200 {
        let out = generate(&pattern, &words, &mut rng).unwrap();
        let digits: Vec<char> = out.chars().collect();
        assert_eq!(digits.len(), 3);
        assert!(digits.iter().all(|d| *d == digits[0]), "{}", out);
    }

    // only the placeholder draws
    let mut rng = ScriptedRng::new().ints(&[4]);
    assert_eq!(generate(&pattern, &words, &mut rng).unwrap(), "444");
    assert_eq!(rng.log, vec![Draw::Int(0, 9)]);
}

#[test]
fn test_escaped_braces_make_no_draws() {
    let words = animal_words();
    let pattern = compile(r"\{word\}").unwrap();
    let mut rng = ScriptedRng::new();
    assert_eq!(generate(&pattern, &words, &mut rng).unwrap(), "{word}");
    assert!(rng.log.is_empty());
}

#[test]
fn test_modifiers_apply_left_to_right() {
    let words = animal_words();
    let pattern = compile("{word+uppercase+reverse}").unwrap();
    let mut rng = ScriptedRng::new().choices(&[1]);
    assert_eq!(generate(&pattern, &words, &mut rng).unwrap(), "RETTO");

    let pattern = compile("{number(123,123)+num2words}").unwrap();
    let mut rng = ScriptedRng::new().ints(&[123]);
    assert_eq!(
        generate(&pattern, &words, &mut rng).unwrap(),
        "One hundred and twenty three"
    );
}

#[test]
fn test_hidden_value_feeds_backreference() {
    let words = animal_words();
    let pattern = compile("{word+hide}({$W1+uppercase})").unwrap();
    let mut rng = ScriptedRng::new().choices(&[1]);
    assert_eq!(generate(&pattern, &words, &mut rng).unwrap(), "(OTTER)");
}

#[test]
fn test_modifier_qualifier_draws_one_coin() {
    let words = animal_words();
    let pattern = compile("{word+uppercase[30]+reverse}").unwrap();

    let mut rng = ScriptedRng::new().choices(&[0]).coins(&[false]);
    assert_eq!(generate(&pattern, &words, &mut rng).unwrap(), "esroh");
    assert_eq!(rng.log, vec![Draw::Choice(3), Draw::Coin(0.3)]);

    let mut rng = ScriptedRng::new().choices(&[0]).coins(&[true]);
    assert_eq!(generate(&pattern, &words, &mut rng).unwrap(), "ESROH");
}

#[test]
fn test_random_modifier_draws_its_choice() {
    let words = animal_words();
    // candidates for a word: bracket, randomcase, reverse, ...
    let pattern = compile("{word+random}").unwrap();
    let mut rng = ScriptedRng::new().choices(&[0, 2]);
    assert_eq!(generate(&pattern, &words, &mut rng).unwrap(), "esroh");
    assert_eq!(rng.log, vec![Draw::Choice(3), Draw::Choice(7)]);

    let pattern = compile("{number(42,42)+random}").unwrap();
    let mut rng = ScriptedRng::new().ints(&[42]).choices(&[1]);
    assert_eq!(generate(&pattern, &words, &mut rng).unwrap(), "Forty two");
    assert_eq!(rng.log, vec![Draw::Int(42, 42), Draw::Choice(8)]);
}

#[test]
fn test_extra_placeholder_kinds() {
    let words = animal_words();
    let pattern = compile("{ordinal(3)}-{chr(65)}{asc(a)}-{phonetic(sos)}").unwrap();
    let mut rng = ScriptedRng::new();
    assert_eq!(
        generate(&pattern, &words, &mut rng).unwrap(),
        "3rd-A97-Sierra Oscar Sierra"
    );
    assert!(rng.log.is_empty());

    let pattern = compile("{longmonth} {shortday}{smiley}{row1}").unwrap();
    let mut rng = ScriptedRng::new().choices(&[11, 6, 4, 0]);
    assert_eq!(generate(&pattern, &words, &mut rng).unwrap(), "December Sun:DQ");

    let pattern = compile("{numberpattern(4)}").unwrap();
    let mut rng = ScriptedRng::new().ints(&[5, 3, 2, 1]).choices(&[0]);
    // 5, then one above, one below, then a repeat of the first digit
    assert_eq!(generate(&pattern, &words, &mut rng).unwrap(), "5655");
}

#[test]
fn test_text_modifiers_in_patterns() {
    let words = animal_words();
    let pattern =
        compile(r#"{word(color)+replace("e","3")+format(00000)}{number(7,7)+format(000)}{word+mid(2,3)+sentencecase}"#)
            .unwrap();
    let mut rng = ScriptedRng::new().choices(&[0, 0]).ints(&[7]);
    assert_eq!(generate(&pattern, &words, &mut rng).unwrap(), "0t3al007Ors");

    let pattern = compile(r"{word+bracket(< > \{ \})}").unwrap();
    let mut rng = ScriptedRng::new().choices(&[1, 1]);
    assert_eq!(generate(&pattern, &words, &mut rng).unwrap(), "{otter}");
}

#[test]
fn test_draws_follow_textual_order() {
    let words = animal_words();
    let pattern = compile("{word(color)}{number(1,6)[50]}{symbol|letter}{$W1+scramble}").unwrap();
    let mut rng = ScriptedRng::new()
        .choices(&[1, 1, 0, 0, 0, 0])
        .coins(&[true])
        .ints(&[3]);

    let out = generate(&pattern, &words, &mut rng).unwrap();
    assert!(out.starts_with("amber3e"), "{}", out);
    assert_eq!(
        rng.log,
        vec![
            Draw::Choice(2),
            Draw::Coin(0.5),
            Draw::Int(1, 6),
            Draw::Choice(2),
            Draw::Choice(26),
            Draw::Choice(5),
            Draw::Choice(4),
            Draw::Choice(3),
            Draw::Choice(2),
        ]
    );
}

#[test]
fn test_generation_errors() {
    let words = animal_words();
    let mut rng = RngSource::seeded(1);

    let pattern = compile("{word(planets)}").unwrap();
    assert_eq!(
        generate(&pattern, &words, &mut rng),
        Err(GenerationError::UnknownWordlist {
            category: "planets".to_string()
        })
    );

    let pattern = compile("{word+num2words}").unwrap();
    assert!(matches!(
        generate(&pattern, &words, &mut rng),
        Err(GenerationError::NotNumeric { .. })
    ));
}

#[test]
fn test_syntax_errors() {
    assert!(compile("{word(").is_err());
    assert!(matches!(
        compile("{unknownkind}"),
        Err(SyntaxError::UnknownPlaceholder { .. })
    ));
    assert!(matches!(
        compile("{word}{$W2}"),
        Err(SyntaxError::UndefinedBackreferenceTarget { index: 2, .. })
    ));
    assert!(matches!(
        compile("{word+sparkle}"),
        Err(SyntaxError::UnknownModifier { .. })
    ));
    assert!(matches!(
        compile("{word|}"),
        Err(SyntaxError::EmptyAlternative { .. })
    ));
    assert!(matches!(
        compile("{word+repeat(9223372036854775807)}"),
        Err(SyntaxError::InvalidArguments { .. })
    ));
    assert!(matches!(
        compile(r#"{"x"+uppercase|"y"}"#),
        Err(SyntaxError::UnexpectedToken { .. })
    ));
}

#[test]
fn test_bad_patterns_file() {
    let file = tempfile::NamedTempFile::new().unwrap();
    fs::write(file.path(), "good: {word}\nbad: {number(5,1)}\n").unwrap();

    match PatternLibrary::from_file(file.path()) {
        Err(PafwertError::InvalidPatternEntry { line, .. }) => assert_eq!(line, 2),
        other => panic!("Expected InvalidPatternEntry, got {:?}", other),
    }
}

#[test]
fn test_generator_config() {
    let words = animal_words();
    let pattern = compile(" {word}  {word} ").unwrap();
    let config: GeneratorConfig =
        serde_json::from_str(r#"{"collapse_whitespace": true, "trim_output": true}"#).unwrap();
    let generator = Generator::with_config(&words, config);

    let mut rng = ScriptedRng::new();
    assert_eq!(generator.generate(&pattern, &mut rng).unwrap(), "horse horse");
}

#[test]
fn test_shared_pattern_across_threads() {
    let words = animal_words();
    let pattern = compile("{word}.{number(10,99)}").unwrap();

    let outputs: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|seed| {
                let (pattern, words) = (&pattern, &words);
                scope.spawn(move || {
                    let mut rng = RngSource::seeded(seed);
                    generate(pattern, words, &mut rng).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(outputs.len(), 4);
    assert!(outputs.iter().all(|out| out.contains('.')));
}
