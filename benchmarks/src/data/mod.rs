mod synthetic;

pub use synthetic::SyntheticSurvey;
