//! Built-in game content and round planning.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::Serialize;

/// Rounds in one session of the word, rhyme and listening games.
pub const ROUNDS_PER_GAME: usize = 5;

/// Avatars a player can pick.
pub const AVATARS: [&str; 12] = [
    "🦁", "🐰", "🐼", "🦊", "🐸", "🦋", "🐝", "🦄", "🐯", "🐨", "🐻", "🐶",
];

pub fn is_avatar(candidate: &str) -> bool {
    AVATARS.contains(&candidate)
}

/// A word from the word bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Word {
    pub word: &'static str,
    pub emoji: &'static str,
    pub category: &'static str,
    pub rhymes: &'static [&'static str],
}

impl Word {
    /// Single words only; phrases are skipped by the speech and listening games.
    pub fn is_single_word(&self) -> bool {
        !self.word.contains(' ')
    }
}

const fn word(
    word: &'static str,
    emoji: &'static str,
    category: &'static str,
    rhymes: &'static [&'static str],
) -> Word {
    Word {
        word,
        emoji,
        category,
        rhymes,
    }
}

pub static WORDS: &[Word] = &[
    word("cat", "🐱", "animals", &["hat", "bat", "mat"]),
    word("dog", "🐕", "animals", &["frog", "log", "fog"]),
    word("bird", "🐦", "animals", &["word", "heard"]),
    word("fish", "🐟", "animals", &["dish", "wish"]),
    word("bee", "🐝", "animals", &["tree", "see", "key"]),
    word("frog", "🐸", "animals", &["dog", "log", "fog"]),
    word("duck", "🦆", "animals", &["truck", "luck"]),
    word("bear", "🐻", "animals", &["hair", "chair", "fair"]),
    word("lion", "🦁", "animals", &[]),
    word("elephant", "🐘", "animals", &[]),
    word("red", "🔴", "colors", &["bed", "head", "said"]),
    word("blue", "🔵", "colors", &["shoe", "new", "two"]),
    word("green", "🟢", "colors", &["bean", "clean", "mean"]),
    word("yellow", "🟡", "colors", &[]),
    word("pink", "🩷", "colors", &["think", "drink", "sink"]),
    word("apple", "🍎", "food", &[]),
    word("banana", "🍌", "food", &[]),
    word("cake", "🎂", "food", &["bake", "lake", "make"]),
    word("cookie", "🍪", "food", &[]),
    word("pizza", "🍕", "food", &[]),
    word("ice cream", "🍦", "food", &[]),
    word("ball", "⚽", "objects", &["tall", "wall", "call"]),
    word("book", "📚", "objects", &["look", "cook", "hook"]),
    word("star", "⭐", "objects", &["car", "far", "jar"]),
    word("sun", "☀️", "objects", &["fun", "run", "one"]),
    word("moon", "🌙", "objects", &["soon", "spoon", "tune"]),
    word("house", "🏠", "objects", &["mouse"]),
    word("tree", "🌳", "objects", &["bee", "see", "key"]),
    word("car", "🚗", "objects", &["star", "far", "jar"]),
    word("run", "🏃", "actions", &["sun", "fun", "one"]),
    word("jump", "🦘", "actions", &["bump", "pump"]),
    word("sing", "🎤", "actions", &["ring", "king", "thing"]),
    word("sleep", "😴", "actions", &["deep", "keep", "sheep"]),
];

/// A picture-labelled choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub text: &'static str,
    pub emoji: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoryQuestion {
    pub question: &'static str,
    pub options: [Choice; 3],
    pub correct_index: usize,
}

impl StoryQuestion {
    pub fn correct_option(&self) -> &Choice {
        &self.options[self.correct_index]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Story {
    pub id: &'static str,
    pub title: &'static str,
    pub emoji: &'static str,
    pub paragraphs: &'static [&'static str],
    pub questions: &'static [StoryQuestion],
}

const fn choice(text: &'static str, emoji: &'static str) -> Choice {
    Choice { text, emoji }
}

pub static STORIES: &[Story] = &[
    Story {
        id: "sunny-day",
        title: "A Sunny Day",
        emoji: "☀️",
        paragraphs: &[
            "It was a beautiful sunny day. 🌞",
            "Tom and his dog Max went to the park. 🐕",
            "They played with a red ball. ⚽",
            "Max loved to catch the ball! 🎉",
            "After playing, they ate ice cream. 🍦",
        ],
        questions: &[
            StoryQuestion {
                question: "What was the weather like?",
                options: [choice("Rainy", "🌧️"), choice("Sunny", "☀️"), choice("Snowy", "❄️")],
                correct_index: 1,
            },
            StoryQuestion {
                question: "What is the dog's name?",
                options: [choice("Max", "🐕"), choice("Buddy", "🐶"), choice("Rex", "🦮")],
                correct_index: 0,
            },
            StoryQuestion {
                question: "What color was the ball?",
                options: [choice("Blue", "🔵"), choice("Green", "🟢"), choice("Red", "🔴")],
                correct_index: 2,
            },
        ],
    },
    Story {
        id: "hungry-cat",
        title: "The Hungry Cat",
        emoji: "🐱",
        paragraphs: &[
            "Luna the cat was very hungry. 🐱",
            "She looked everywhere for food. 👀",
            "Luna found a big fish! 🐟",
            "She ate the fish and was happy. 😸",
            "Then Luna took a long nap. 😴",
        ],
        questions: &[
            StoryQuestion {
                question: "What is the cat's name?",
                options: [choice("Whiskers", "🐱"), choice("Luna", "🌙"), choice("Mittens", "🧤")],
                correct_index: 1,
            },
            StoryQuestion {
                question: "What did Luna find?",
                options: [choice("A mouse", "🐭"), choice("A bird", "🐦"), choice("A fish", "🐟")],
                correct_index: 2,
            },
            StoryQuestion {
                question: "What did Luna do after eating?",
                options: [choice("Played", "🎮"), choice("Took a nap", "😴"), choice("Ran away", "🏃")],
                correct_index: 1,
            },
        ],
    },
    Story {
        id: "birthday-party",
        title: "The Birthday Party",
        emoji: "🎂",
        paragraphs: &[
            "Today is Emma's birthday! 🎉",
            "She is turning five years old. 🖐️",
            "Her friends brought colorful balloons. 🎈",
            "They ate a big chocolate cake. 🎂",
            "Emma got a new teddy bear! 🧸",
        ],
        questions: &[
            StoryQuestion {
                question: "How old is Emma turning?",
                options: [choice("Four", "4️⃣"), choice("Five", "5️⃣"), choice("Six", "6️⃣")],
                correct_index: 1,
            },
            StoryQuestion {
                question: "What did her friends bring?",
                options: [choice("Flowers", "🌸"), choice("Balloons", "🎈"), choice("Books", "📚")],
                correct_index: 1,
            },
            StoryQuestion {
                question: "What gift did Emma get?",
                options: [choice("A doll", "🪆"), choice("A teddy bear", "🧸"), choice("A bike", "🚲")],
                correct_index: 1,
            },
        ],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RhymeOption {
    pub word: &'static str,
    pub emoji: &'static str,
    pub is_rhyme: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RhymeSet {
    pub target_word: &'static str,
    pub target_emoji: &'static str,
    pub options: [RhymeOption; 4],
}

const fn opt(word: &'static str, emoji: &'static str, is_rhyme: bool) -> RhymeOption {
    RhymeOption {
        word,
        emoji,
        is_rhyme,
    }
}

pub static RHYME_SETS: &[RhymeSet] = &[
    RhymeSet {
        target_word: "cat",
        target_emoji: "🐱",
        options: [opt("hat", "🎩", true), opt("dog", "🐕", false), opt("bat", "🦇", true), opt("fish", "🐟", false)],
    },
    RhymeSet {
        target_word: "bee",
        target_emoji: "🐝",
        options: [opt("tree", "🌳", true), opt("ball", "⚽", false), opt("key", "🔑", true), opt("car", "🚗", false)],
    },
    RhymeSet {
        target_word: "sun",
        target_emoji: "☀️",
        options: [opt("run", "🏃", true), opt("moon", "🌙", false), opt("fun", "🎉", true), opt("star", "⭐", false)],
    },
    RhymeSet {
        target_word: "cake",
        target_emoji: "🎂",
        options: [opt("lake", "🏞️", true), opt("cookie", "🍪", false), opt("bake", "👨‍🍳", true), opt("pie", "🥧", false)],
    },
    RhymeSet {
        target_word: "star",
        target_emoji: "⭐",
        options: [opt("car", "🚗", true), opt("moon", "🌙", false), opt("jar", "🫙", true), opt("sun", "☀️", false)],
    },
    RhymeSet {
        target_word: "ball",
        target_emoji: "⚽",
        options: [opt("wall", "🧱", true), opt("bat", "🏏", false), opt("tall", "📏", true), opt("kick", "🦵", false)],
    },
    RhymeSet {
        target_word: "house",
        target_emoji: "🏠",
        options: [opt("mouse", "🐭", true), opt("door", "🚪", false), opt("cat", "🐱", false), opt("window", "🪟", false)],
    },
    RhymeSet {
        target_word: "ring",
        target_emoji: "💍",
        options: [opt("sing", "🎤", true), opt("bell", "🔔", false), opt("king", "👑", true), opt("crown", "👸", false)],
    },
];

/// One rhyme round with its options in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RhymeRound {
    pub set: &'static RhymeSet,
    pub options: Vec<RhymeOption>,
}

/// One listening round: the spoken target hidden among distractors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListenRound {
    pub target: &'static Word,
    pub options: Vec<&'static Word>,
}

fn single_words() -> Vec<&'static Word> {
    WORDS.iter().filter(|w| w.is_single_word()).collect()
}

/// Words to say in a speech session.
pub fn plan_word_sound<R: Rng + ?Sized>(rng: &mut R) -> Vec<&'static Word> {
    let mut words = single_words();
    words.shuffle(rng);
    words.truncate(ROUNDS_PER_GAME);
    words
}

/// Rhyme rounds, each with its options shuffled.
pub fn plan_rhyme_time<R: Rng + ?Sized>(rng: &mut R) -> Vec<RhymeRound> {
    let mut sets: Vec<&'static RhymeSet> = RHYME_SETS.iter().collect();
    sets.shuffle(rng);
    sets.into_iter()
        .take(ROUNDS_PER_GAME)
        .map(|set| {
            let mut options = set.options.to_vec();
            options.shuffle(rng);
            RhymeRound { set, options }
        })
        .collect()
}

/// The story for a reading session; its questions are asked in order.
pub fn plan_picture_story<R: Rng + ?Sized>(rng: &mut R) -> &'static Story {
    STORIES.choose(rng).unwrap_or(&STORIES[0])
}

/// Listening rounds: every fourth shuffled word becomes a target with three
/// distinct distractors.
pub fn plan_listen_choose<R: Rng + ?Sized>(rng: &mut R) -> Vec<ListenRound> {
    let mut words = single_words();
    words.shuffle(rng);

    (0..ROUNDS_PER_GAME)
        .map(|i| i * 4)
        .take_while(|&idx| idx < words.len())
        .map(|idx| {
            let target = words[idx];
            let others: Vec<&'static Word> = words
                .iter()
                .copied()
                .filter(|w| w.word != target.word)
                .collect();
            let mut options: Vec<&'static Word> =
                others.choose_multiple(rng, 3).copied().collect();
            options.push(target);
            options.shuffle(rng);
            ListenRound { target, options }
        })
        .collect()
}
