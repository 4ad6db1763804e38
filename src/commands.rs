pub mod hangman;

pub fn list() -> Vec<crate::utils::poise::Command> {
    vec![hangman::hangman(), hangman::hangman_status()]
}
