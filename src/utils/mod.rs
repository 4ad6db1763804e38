pub mod poise;
pub mod serenity;
