//! Porter suffix-stripping stemmer
//!
//! The 1980 Porter algorithm with the NLTK extensions applied (irregular
//! forms, the two-letter CVC case, `ies`/`ied` shortcuts, `alli` recursion,
//! `fulli` and `logi`). The classifier vocabulary was produced by NLTK's
//! `PorterStemmer()`, so every rule here mirrors that variant rule for rule.

/// Words whose stem is fixed instead of derived from the rules
const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("sky", "sky"),
    ("skies", "sky"),
    ("dying", "die"),
    ("lying", "lie"),
    ("tying", "tie"),
    ("news", "news"),
    ("innings", "inning"),
    ("inning", "inning"),
    ("outings", "outing"),
    ("outing", "outing"),
    ("cannings", "canning"),
    ("canning", "canning"),
    ("howe", "howe"),
    ("proceed", "proceed"),
    ("exceed", "exceed"),
    ("succeed", "succeed"),
];

type Condition<'a> = &'a dyn Fn(&str) -> bool;

/// A suffix rule: `(suffix, replacement, condition on the remaining stem)`
type Rule<'a> = (&'static str, &'static str, Option<Condition<'a>>);

#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    pub fn new() -> Self {
        Self
    }

    /// Stem a single word. The word is lowercased first.
    pub fn stem(&self, word: &str) -> String {
        let word = word.to_lowercase();

        if let Some((_, stem)) = IRREGULAR_FORMS.iter().find(|(form, _)| *form == word) {
            return stem.to_string();
        }

        if word.chars().count() <= 2 {
            return word;
        }

        let word = step1a(&word);
        let word = step1b(&word);
        let word = step1c(&word);
        let word = step2(&word);
        let word = step3(&word);
        let word = step4(&word);
        let word = step5a(&word);
        step5b(&word)
    }
}

/// Consonant flag per char. `y` is a consonant at the start of a word or
/// after a vowel, a vowel after a consonant.
fn consonants(word: &str) -> Vec<bool> {
    let mut flags: Vec<bool> = Vec::with_capacity(word.len());
    for c in word.chars() {
        let consonant = match c {
            'a' | 'e' | 'i' | 'o' | 'u' => false,
            'y' => flags.last().map_or(true, |prev| !prev),
            _ => true,
        };
        flags.push(consonant);
    }
    flags
}

/// Number of vowel-consonant sequences, the `m` in `[C](VC){m}[V]`
fn measure(stem: &str) -> usize {
    let mut m = 0;
    let mut prev_vowel = false;

    for consonant in consonants(stem) {
        if consonant && prev_vowel {
            m += 1;
        }
        prev_vowel = !consonant;
    }

    m
}

fn has_positive_measure(stem: &str) -> bool {
    measure(stem) > 0
}

fn measure_gt_1(stem: &str) -> bool {
    measure(stem) > 1
}

fn contains_vowel(stem: &str) -> bool {
    consonants(stem).iter().any(|consonant| !consonant)
}

fn ends_double_consonant(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    n >= 2 && chars[n - 1] == chars[n - 2] && consonants(word)[n - 1]
}

/// `*o`: stem ends consonant-vowel-consonant where the last consonant is not
/// w, x or y. Two-letter vowel-consonant stems also qualify.
fn ends_cvc(word: &str) -> bool {
    let cons = consonants(word);
    let n = cons.len();

    if n >= 3 {
        return cons[n - 3]
            && !cons[n - 2]
            && cons[n - 1]
            && !matches!(word.chars().last(), Some('w' | 'x' | 'y'));
    }

    n == 2 && !cons[0] && cons[1]
}

/// Apply the first rule whose suffix matches. A matching suffix whose
/// condition fails stops the search and leaves the word unchanged.
fn apply_rules(word: &str, rules: &[Rule<'_>]) -> String {
    for (suffix, replacement, condition) in rules {
        if let Some(stem) = word.strip_suffix(suffix) {
            let accepted = condition.map_or(true, |cond| cond(stem));
            return if accepted {
                format!("{}{}", stem, replacement)
            } else {
                word.to_string()
            };
        }
    }
    word.to_string()
}

fn step1a(word: &str) -> String {
    if word.ends_with("ies") && word.chars().count() == 4 {
        return format!("{}ie", &word[..word.len() - 3]);
    }

    apply_rules(
        word,
        &[
            ("sses", "ss", None),
            ("ies", "i", None),
            ("ss", "ss", None),
            ("s", "", None),
        ],
    )
}

fn step1b(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ied") {
        return if word.chars().count() == 4 {
            format!("{}ie", stem)
        } else {
            format!("{}i", stem)
        };
    }

    if let Some(stem) = word.strip_suffix("eed") {
        return if measure(stem) > 0 {
            format!("{}ee", stem)
        } else {
            word.to_string()
        };
    }

    let intermediate = ["ed", "ing"]
        .iter()
        .filter_map(|suffix| word.strip_suffix(suffix))
        .find(|stem| contains_vowel(stem));

    let Some(stem) = intermediate else {
        return word.to_string();
    };

    for (suffix, replacement) in [("at", "ate"), ("bl", "ble"), ("iz", "ize")] {
        if let Some(base) = stem.strip_suffix(suffix) {
            return format!("{}{}", base, replacement);
        }
    }

    if ends_double_consonant(stem) {
        return match stem.chars().last() {
            Some('l' | 's' | 'z') => stem.to_string(),
            _ => {
                let mut shortened = stem.to_string();
                shortened.pop();
                shortened
            }
        };
    }

    if measure(stem) == 1 && ends_cvc(stem) {
        format!("{}e", stem)
    } else {
        stem.to_string()
    }
}

fn step1c(word: &str) -> String {
    let preceded_by_consonant: Condition<'_> = &|stem: &str| {
        let cons = consonants(stem);
        cons.len() > 1 && cons[cons.len() - 1]
    };

    apply_rules(word, &[("y", "i", Some(preceded_by_consonant))])
}

fn step2(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("alli") {
        if has_positive_measure(stem) {
            return step2(&format!("{}al", stem));
        }
    }

    // The `l` of `logi` stays with the stem so that short stems like
    // `geo` and `theo` are treated like `archaeo` and `philo`.
    let logi_condition: Condition<'_> = &|_: &str| has_positive_measure(&word[..word.len() - 3]);
    let positive: Condition<'_> = &has_positive_measure;

    apply_rules(
        word,
        &[
            ("ational", "ate", Some(positive)),
            ("tional", "tion", Some(positive)),
            ("enci", "ence", Some(positive)),
            ("anci", "ance", Some(positive)),
            ("izer", "ize", Some(positive)),
            ("bli", "ble", Some(positive)),
            ("alli", "al", Some(positive)),
            ("entli", "ent", Some(positive)),
            ("eli", "e", Some(positive)),
            ("ousli", "ous", Some(positive)),
            ("ization", "ize", Some(positive)),
            ("ation", "ate", Some(positive)),
            ("ator", "ate", Some(positive)),
            ("alism", "al", Some(positive)),
            ("iveness", "ive", Some(positive)),
            ("fulness", "ful", Some(positive)),
            ("ousness", "ous", Some(positive)),
            ("aliti", "al", Some(positive)),
            ("iviti", "ive", Some(positive)),
            ("biliti", "ble", Some(positive)),
            ("fulli", "ful", Some(positive)),
            ("logi", "log", Some(logi_condition)),
        ],
    )
}

fn step3(word: &str) -> String {
    let positive: Condition<'_> = &has_positive_measure;

    apply_rules(
        word,
        &[
            ("icate", "ic", Some(positive)),
            ("ative", "", Some(positive)),
            ("alize", "al", Some(positive)),
            ("iciti", "ic", Some(positive)),
            ("ical", "ic", Some(positive)),
            ("ful", "", Some(positive)),
            ("ness", "", Some(positive)),
        ],
    )
}

fn step4(word: &str) -> String {
    let gt1: Condition<'_> = &measure_gt_1;
    let ion_condition: Condition<'_> =
        &|stem: &str| measure(stem) > 1 && (stem.ends_with('s') || stem.ends_with('t'));

    apply_rules(
        word,
        &[
            ("al", "", Some(gt1)),
            ("ance", "", Some(gt1)),
            ("ence", "", Some(gt1)),
            ("er", "", Some(gt1)),
            ("ic", "", Some(gt1)),
            ("able", "", Some(gt1)),
            ("ible", "", Some(gt1)),
            ("ant", "", Some(gt1)),
            ("ement", "", Some(gt1)),
            ("ment", "", Some(gt1)),
            ("ent", "", Some(gt1)),
            ("ion", "", Some(ion_condition)),
            ("ou", "", Some(gt1)),
            ("ism", "", Some(gt1)),
            ("ate", "", Some(gt1)),
            ("iti", "", Some(gt1)),
            ("ous", "", Some(gt1)),
            ("ive", "", Some(gt1)),
            ("ize", "", Some(gt1)),
        ],
    )
}

fn step5a(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('e') {
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            return stem.to_string();
        }
    }
    word.to_string()
}

fn step5b(word: &str) -> String {
    let condition: Condition<'_> = &|_: &str| measure(&word[..word.len() - 1]) > 1;
    apply_rules(word, &[("ll", "l", Some(condition))])
}
