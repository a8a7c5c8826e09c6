mod card;
mod ids;
mod progress;

pub use card::{Card, CardContent, CardError, Category, Difficulty, Hotspot, ImageRef};
pub use ids::{CardId, ParseIdError, UserId};
pub use progress::{
    ProgressError, ProgressRecord, ProgressSummary, ProgressUpdate, MAX_DIFFICULTY_RATING,
    MIN_DIFFICULTY_RATING,
};
