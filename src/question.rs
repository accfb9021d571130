use rand::{seq::SliceRandom, Rng};

/// Universe of characters options are drawn from.
pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A single "find the missing character" item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// The full template, shown as the reference example
    pub pattern: String,
    /// The template with `answer` removed and the rest shuffled
    pub puzzle: String,
    pub answer: char,
    pub options: Vec<char>,
}

impl Question {
    pub fn is_correct(&self, selected: char) -> bool {
        selected.eq_ignore_ascii_case(&self.answer)
    }

    /// Finds the option matching a typed character, ignoring case.
    pub fn option_for(&self, typed: char) -> Option<char> {
        self.options
            .iter()
            .copied()
            .find(|o| o.eq_ignore_ascii_case(&typed))
    }
}

/// Builds one question from `template`. The template must be non-empty and
/// leave at least `option_count - 1` alphabet characters unused.
pub fn generate_question<R: Rng + ?Sized>(
    template: &str,
    option_count: usize,
    rng: &mut R,
) -> Question {
    let mut chars: Vec<char> = template.chars().collect();
    let missing_idx = rng.gen_range(0..chars.len());
    let answer = chars.remove(missing_idx);
    chars.shuffle(rng);

    let alphabet: Vec<char> = ALPHABET.chars().collect();
    let mut options = Vec::with_capacity(option_count);
    options.push(answer);
    while options.len() < option_count {
        if let Some(&candidate) = alphabet.choose(rng) {
            if !template.contains(candidate) && !options.contains(&candidate) {
                options.push(candidate);
            }
        }
    }
    options.shuffle(rng);

    Question {
        pattern: template.to_string(),
        puzzle: chars.into_iter().collect(),
        answer,
        options,
    }
}

/// Builds a fresh question list for a round. Repeats across questions are fine.
pub fn generate_round<R: Rng + ?Sized>(
    template: &str,
    question_count: usize,
    option_count: usize,
    rng: &mut R,
) -> Vec<Question> {
    (0..question_count)
        .map(|_| generate_question(template, option_count, rng))
        .collect()
}
