#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
    #[error(transparent)]
    Skills(#[from] skillbox_skills::Error),
    #[error("prompt '{prompt}' returned an answer of the wrong shape")]
    UnexpectedAnswer { prompt: String },
}

pub type Result<T> = std::result::Result<T, Error>;
