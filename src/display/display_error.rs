use opencv::Error as CvError;
use std::fmt;

#[derive(Debug)]
pub enum DisplayError {
    WindowCreate(CvError),
    Render(CvError),
    Input(CvError),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::WindowCreate(e) => write!(f, "could not create preview window: {e}"),
            DisplayError::Render(e) => write!(f, "preview render failed: {e}"),
            DisplayError::Input(e) => write!(f, "preview input polling failed: {e}"),
        }
    }
}

impl std::error::Error for DisplayError {}
