//! Core types for the speech-kids games.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Stars needed to climb one level.
pub const STARS_PER_LEVEL: u32 = 50;

/// Avatar given to a fresh profile.
pub const DEFAULT_AVATAR: &str = "🦁";

/// Level reached with the given number of stars.
pub fn level_for_stars(total_stars: u32) -> u32 {
    total_stars / STARS_PER_LEVEL + 1
}

/// The four mini-games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameType {
    /// Say the word shown on screen.
    WordSound,
    /// Read a short story and answer questions about it.
    PictureStory,
    /// Pick the word that rhymes.
    RhymeTime,
    /// Hear a word and pick its picture.
    ListenChoose,
}

impl GameType {
    pub const ALL: [GameType; 4] = [
        GameType::WordSound,
        GameType::PictureStory,
        GameType::RhymeTime,
        GameType::ListenChoose,
    ];

    /// Wire name, also used as the storage key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WordSound => "word-sound",
            Self::PictureStory => "picture-story",
            Self::RhymeTime => "rhyme-time",
            Self::ListenChoose => "listen-choose",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::WordSound => "Word Sound Match",
            Self::PictureStory => "Picture Story",
            Self::RhymeTime => "Rhyme Time",
            Self::ListenChoose => "Listen & Choose",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::WordSound => "🎤",
            Self::PictureStory => "📖",
            Self::RhymeTime => "🎵",
            Self::ListenChoose => "👂",
        }
    }

    /// How a response in this game is graded.
    ///
    /// Only the speech game tolerates noisy input; the others compare the
    /// chosen option directly.
    pub fn matching_mode(self) -> MatchingMode {
        match self {
            Self::WordSound => MatchingMode::Fuzzy,
            Self::PictureStory | Self::RhymeTime | Self::ListenChoose => MatchingMode::Exact,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::WordSound => 0,
            Self::PictureStory => 1,
            Self::RhymeTime => 2,
            Self::ListenChoose => 3,
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameType::ALL
            .into_iter()
            .find(|game| game.as_str() == s)
            .ok_or_else(|| GameError::InvalidGameType(s.to_string()))
    }
}

/// Matching mode for graded responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingMode {
    /// Normalized response must equal the expected answer.
    Exact,
    /// Equality, containment either way, or a small edit distance.
    Fuzzy,
}

impl Default for MatchingMode {
    fn default() -> Self {
        Self::Exact
    }
}

/// Cumulative statistics for one game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameProgress {
    pub games_played: u32,
    pub correct_answers: u32,
    pub total_answers: u32,
    pub highest_streak: u32,
}

impl GameProgress {
    /// Whether the counters can have been produced by the scoring engine.
    pub fn is_consistent(&self) -> bool {
        self.correct_answers <= self.total_answers && self.highest_streak <= self.correct_answers
    }

    /// Rounded percentage of correct answers, 0 when nothing was answered.
    pub fn accuracy(&self) -> u32 {
        percentage(self.correct_answers, self.total_answers)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

/// Progress for every game type, always exactly one entry each.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<GameType, GameProgress>", into = "BTreeMap<GameType, GameProgress>")]
pub struct ProgressBook {
    entries: [GameProgress; 4],
}

impl ProgressBook {
    pub fn get(&self, game: GameType) -> &GameProgress {
        &self.entries[game.index()]
    }

    pub(crate) fn get_mut(&mut self, game: GameType) -> &mut GameProgress {
        &mut self.entries[game.index()]
    }

    /// Replace one game's counters, e.g. when restoring from storage.
    pub fn set(&mut self, game: GameType, progress: GameProgress) {
        self.entries[game.index()] = progress;
    }

    pub fn iter(&self) -> impl Iterator<Item = (GameType, &GameProgress)> {
        GameType::ALL.into_iter().map(move |game| (game, self.get(game)))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(GameProgress::is_empty)
    }
}

impl From<BTreeMap<GameType, GameProgress>> for ProgressBook {
    /// Games missing from the map start from zero.
    fn from(map: BTreeMap<GameType, GameProgress>) -> Self {
        let mut book = Self::default();
        for (game, progress) in map {
            book.set(game, progress);
        }
        book
    }
}

impl From<ProgressBook> for BTreeMap<GameType, GameProgress> {
    fn from(book: ProgressBook) -> Self {
        book.iter().map(|(game, progress)| (game, *progress)).collect()
    }
}

/// A player's identity and currency.
///
/// `level` is never stored: it is always derived from `total_stars`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProfileRecord", into = "ProfileRecord")]
pub struct PlayerProfile {
    name: String,
    avatar: String,
    total_stars: u32,
    achievements: Vec<String>,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            avatar: DEFAULT_AVATAR.to_string(),
            total_stars: 0,
            achievements: Vec::new(),
        }
    }
}

impl PlayerProfile {
    /// Rebuild a profile from stored fields. Duplicate badges are dropped,
    /// keeping the first occurrence.
    pub fn restore(
        name: impl Into<String>,
        avatar: impl Into<String>,
        total_stars: u32,
        achievements: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut profile = Self {
            name: name.into(),
            avatar: avatar.into(),
            total_stars,
            achievements: Vec::new(),
        };
        for badge in achievements {
            profile.insert_achievement(badge);
        }
        profile
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    pub fn total_stars(&self) -> u32 {
        self.total_stars
    }

    pub fn level(&self) -> u32 {
        level_for_stars(self.total_stars)
    }

    pub fn achievements(&self) -> &[String] {
        &self.achievements
    }

    pub fn has_achievement(&self, badge: &str) -> bool {
        self.achievements.iter().any(|a| a == badge)
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn set_avatar(&mut self, avatar: String) {
        self.avatar = avatar;
    }

    pub(crate) fn add_stars(&mut self, amount: u32) {
        self.total_stars = self.total_stars.saturating_add(amount);
    }

    pub(crate) fn insert_achievement(&mut self, badge: String) -> bool {
        if self.has_achievement(&badge) {
            return false;
        }
        self.achievements.push(badge);
        true
    }
}

/// Serialized form of a profile; `level` is written for readers and ignored
/// when reading back.
#[derive(Clone, Serialize, Deserialize)]
struct ProfileRecord {
    name: String,
    avatar: String,
    total_stars: u32,
    #[serde(default)]
    level: u32,
    #[serde(default)]
    achievements: Vec<String>,
}

impl From<ProfileRecord> for PlayerProfile {
    fn from(record: ProfileRecord) -> Self {
        PlayerProfile::restore(record.name, record.avatar, record.total_stars, record.achievements)
    }
}

impl From<PlayerProfile> for ProfileRecord {
    fn from(profile: PlayerProfile) -> Self {
        ProfileRecord {
            level: profile.level(),
            name: profile.name,
            avatar: profile.avatar,
            total_stars: profile.total_stars,
            achievements: profile.achievements,
        }
    }
}

/// Totals across all games, as shown on the stats screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallStats {
    pub total_games_played: u32,
    pub total_correct: u32,
    pub total_answers: u32,
    pub highest_streak: u32,
    /// Rounded percentage.
    pub accuracy: u32,
}

impl OverallStats {
    /// Sums are taken in `u64` and clamped, so large stored counters
    /// saturate instead of overflowing.
    pub fn from_progress(progress: &ProgressBook) -> Self {
        let (games, correct, answers, highest_streak) = progress.iter().fold(
            (0u64, 0u64, 0u64, 0u32),
            |(games, correct, answers, streak), (_, p)| {
                (
                    games + u64::from(p.games_played),
                    correct + u64::from(p.correct_answers),
                    answers + u64::from(p.total_answers),
                    streak.max(p.highest_streak),
                )
            },
        );

        let accuracy = if answers == 0 {
            0
        } else {
            ((correct as f64 / answers as f64) * 100.0).round() as u32
        };

        Self {
            total_games_played: clamp_u32(games),
            total_correct: clamp_u32(correct),
            total_answers: clamp_u32(answers),
            highest_streak,
            accuracy,
        }
    }
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
