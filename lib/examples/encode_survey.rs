//! Build a vocabulary from a small in-memory survey, encode a few new
//! responses, then decode them with and without the existence mask.
//!
//! ```sh
//! cargo run --example encode_survey
//! ```

use survey_encoding::dataset::SurveyTable;
use survey_encoding::preprocessing::{FittedTransformer, Vocabulary, VocabularyBuilder};

const TRAINING: &str = "\
smoker,diet,exercise
no,vegan,daily
no,omnivore,weekly
yes,omnivore,NA
no,omnivore,daily
NA,vegetarian,weekly
yes,vegan,never
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let table = SurveyTable::from_reader(TRAINING.as_bytes())?;
    let vocabulary = VocabularyBuilder::new(2)
        .with_column_names(table.headers().iter().cloned())
        .build(table.rows())?;

    println!("Encoded layout ({} columns):", vocabulary.total_width());
    for label in vocabulary.feature_labels() {
        println!("  {}", label);
    }

    let responses = [
        ["yes", "vegan", "daily"],
        ["NA", "pescatarian", "weekly"],
    ];
    let encoded = vocabulary.encode(&responses)?;
    println!("\nvalues:\n{}", encoded.values);
    println!("existence:\n{}", encoded.existence);

    let bytes = vocabulary.to_bytes()?;
    let restored = Vocabulary::from_bytes(&bytes)?;

    let guessed = restored.decode(encoded.values.view())?;
    let masked = restored.decode_masked(encoded.values.view(), encoded.existence.view())?;
    for ((response, guess), mask) in responses.iter().zip(&guessed).zip(&masked) {
        println!("\n{:?}\n  arg-max: {:?}\n  masked:  {:?}", response, guess, mask);
    }
    Ok(())
}
