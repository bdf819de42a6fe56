use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use survey_encoding::dataset::SurveyTable;
use survey_encoding::preprocessing::{
    build_vocabulary, column_slice, decode, decode_masked, encode, FittedTransformer, Row,
    Transformer, Vocabulary, VocabularyBuilder,
};

const ANSWERS: [&str; 6] = ["agree", "disagree", "neutral", "NA", "strongly agree", "unsure"];

/// Deterministic pseudo-random survey: `n_rows` x `n_columns` answers drawn
/// from a skewed pool so that some answers fall under any small cutoff.
fn synthetic_survey(n_rows: usize, n_columns: usize, seed: u64) -> Vec<Row> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as usize
    };
    (0..n_rows)
        .map(|_| {
            (0..n_columns)
                .map(|col| {
                    let draw = next() % 20;
                    // Squaring concentrates mass on the first answers.
                    let idx = (draw * draw) / 67;
                    let answer = ANSWERS[(idx + col) % ANSWERS.len()];
                    if col == n_columns - 1 {
                        // Last column only ever holds rare answers.
                        format!("free text {}", next() % 1000)
                    } else {
                        answer.to_string()
                    }
                })
                .collect()
        })
        .collect()
}

fn frequencies(rows: &[Row]) -> Vec<HashMap<&str, usize>> {
    let mut counts = vec![HashMap::new(); rows[0].len()];
    for row in rows {
        for (col, answer) in row.iter().enumerate() {
            if answer != "NA" {
                *counts[col].entry(answer.as_str()).or_insert(0) += 1;
            }
        }
    }
    counts
}

#[test]
fn retained_answers_are_exactly_the_frequent_ones() {
    let rows = synthetic_survey(400, 5, 7);
    let counts = frequencies(&rows);

    for cutoff in [1, 2, 5, 40] {
        let vocabulary = build_vocabulary(&rows, cutoff).unwrap();
        for (col, column_counts) in counts.iter().enumerate() {
            for (&answer, &count) in column_counts {
                assert_eq!(
                    vocabulary.is_retained(col, answer),
                    count >= cutoff,
                    "cutoff {} column {} answer {:?} count {}",
                    cutoff,
                    col,
                    answer,
                    count
                );
            }
            for answer in vocabulary.column_values(col).unwrap() {
                assert!(column_counts[answer.as_str()] >= cutoff);
            }
        }
    }
}

#[test]
fn widths_agree_with_value_list_and_mappings() {
    let rows = synthetic_survey(200, 4, 11);
    let vocabulary = build_vocabulary(&rows, 3).unwrap();

    let total: usize = vocabulary.column_widths().iter().sum();
    assert_eq!(total, vocabulary.global_values().len());
    for col in 0..vocabulary.n_columns() {
        let values = vocabulary.column_values(col).unwrap();
        assert_eq!(values.len(), vocabulary.column_widths()[col]);
        for (local, answer) in values.iter().enumerate() {
            assert_eq!(vocabulary.local_index(col, answer), Some(local));
        }
    }
}

#[test]
fn rare_only_column_has_zero_width_and_decodes_missing() {
    let rows = synthetic_survey(100, 3, 3);
    let vocabulary = build_vocabulary(&rows, 5).unwrap();
    assert_eq!(vocabulary.column_widths()[2], 0);

    let encoded = encode(&rows, &vocabulary).unwrap();
    assert_eq!(column_slice(encoded.values.view(), &vocabulary, 2).unwrap().ncols(), 0);

    let decoded = decode(encoded.values.view(), &vocabulary).unwrap();
    assert!(decoded.iter().all(|row| row[2] == "NA"));
}

#[test]
fn retained_rows_roundtrip_exactly() {
    let rows = synthetic_survey(300, 4, 19);
    let vocabulary = build_vocabulary(&rows, 2).unwrap();

    let fully_known: Vec<Row> = rows
        .iter()
        .filter(|row| {
            row.iter()
                .enumerate()
                .all(|(col, answer)| answer == "NA" || vocabulary.is_retained(col, answer))
        })
        .cloned()
        .collect();
    assert!(!fully_known.is_empty());

    let encoded = encode(&fully_known, &vocabulary).unwrap();
    let decoded = decode_masked(encoded.values.view(), encoded.existence.view(), &vocabulary).unwrap();
    assert_eq!(decoded, fully_known);

    // Plain decode agrees wherever the answer was present.
    let plain = decode(encoded.values.view(), &vocabulary).unwrap();
    for (original, restored) in fully_known.iter().zip(&plain) {
        for (answer, guess) in original.iter().zip(restored) {
            if answer != "NA" {
                assert_eq!(answer, guess);
            }
        }
    }
}

#[test]
fn existence_mask_marks_whole_blocks() {
    let rows = synthetic_survey(150, 4, 23);
    let vocabulary = build_vocabulary(&rows, 2).unwrap();
    let encoded = encode(&rows, &vocabulary).unwrap();

    for (r, row) in rows.iter().enumerate() {
        for (col, answer) in row.iter().enumerate() {
            let mask = column_slice(encoded.existence.view(), &vocabulary, col).unwrap();
            let values = column_slice(encoded.values.view(), &vocabulary, col).unwrap();
            let known = answer != "NA" && vocabulary.is_retained(col, answer);

            let expected = if known { 1.0 } else { 0.0 };
            assert!(mask.row(r).iter().all(|&e| e == expected));
            assert_eq!(values.row(r).sum(), expected);
        }
    }
}

#[test]
fn rebuilding_gives_identical_bytes() {
    let rows = synthetic_survey(250, 5, 31);
    let first = build_vocabulary(&rows, 2).unwrap().to_bytes().unwrap();
    let second = build_vocabulary(&rows, 2).unwrap().to_bytes().unwrap();
    assert_eq!(first, second);
}

#[test]
fn csv_to_saved_vocabulary_and_back() {
    let csv = "gender,colour,comment\n\
               f,red,NA\n\
               m,red,nice\n\
               f,blue,NA\n\
               NA,red,\"good, really\"\n";
    let table = SurveyTable::from_reader(csv.as_bytes()).unwrap();
    let vocabulary = VocabularyBuilder::new(2)
        .with_column_names(table.headers().iter().cloned())
        .fit(table.rows())
        .unwrap();
    assert_eq!(vocabulary.column_widths(), &[1, 1, 0]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("survey.vocab");
    vocabulary.save_to_file(&path).unwrap();
    let loaded = Vocabulary::load_from_file(&path).unwrap();
    assert_eq!(loaded, vocabulary);
    assert_eq!(loaded.feature_labels(), vec!["gender=f", "colour=red"]);

    let encoded = loaded.transform(table.rows()).unwrap();
    let decoded = loaded.inverse_transform(&encoded).unwrap();
    assert_eq!(decoded[1], vec!["f", "red", "NA"]);
}

#[test]
fn fit_transform_matches_fit_then_transform() {
    let rows = synthetic_survey(60, 3, 5);
    let builder = VocabularyBuilder::new(2);

    let direct = builder.fit_transform(&rows).unwrap();
    let fitted = builder.fit(&rows).unwrap();
    assert_eq!(direct, fitted.transform(&rows).unwrap());
}

#[test]
fn shared_vocabulary_across_threads() {
    let rows = synthetic_survey(200, 4, 41);
    let vocabulary = Arc::new(build_vocabulary(&rows, 2).unwrap());
    let expected = encode(&rows, &vocabulary).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let vocabulary = Arc::clone(&vocabulary);
            let rows = rows.clone();
            thread::spawn(move || {
                let encoded = vocabulary.encode(&rows).unwrap();
                let decoded = vocabulary.decode(encoded.values.view()).unwrap();
                (encoded, decoded)
            })
        })
        .collect();

    let reference = decode(expected.values.view(), &vocabulary).unwrap();
    for handle in handles {
        let (encoded, decoded) = handle.join().unwrap();
        assert_eq!(encoded, expected);
        assert_eq!(decoded, reference);
    }
}

#[test]
fn corrupted_file_yields_no_vocabulary() {
    let rows = synthetic_survey(50, 3, 2);
    let vocabulary = build_vocabulary(&rows, 1).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.vocab");
    let mut bytes = vocabulary.to_bytes().unwrap();
    bytes.truncate(bytes.len() - 5);
    std::fs::write(&path, &bytes).unwrap();

    assert!(Vocabulary::load_from_file(&path).is_err());
}
