use sqlx::Row;

use exam_core::model::{
    Bilingual, OptionKey, Question, QuestionId, TestId, TestStatus, UserId,
};

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn test_id_from_i64(v: i64) -> Result<TestId, StorageError> {
    Ok(TestId::new(i64_to_u64("test_id", v)?))
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    Ok(QuestionId::new(i64_to_u64("question_id", v)?))
}

pub(crate) fn user_id_to_string(user: UserId) -> String {
    user.value().to_string()
}

pub(crate) fn user_id_from_str(s: &str) -> Result<UserId, StorageError> {
    s.parse::<UserId>().map_err(ser)
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

/// Reassembles bilingual text from its two columns.
pub(crate) fn bilingual_from_columns(english: String, hindi: String) -> Result<Bilingual, StorageError> {
    Bilingual::new(english, hindi).map_err(ser)
}

/// Optional bilingual text: both columns NULL means absent; an English
/// rendering without the Hindi column (or vice versa) is tolerated.
pub(crate) fn optional_bilingual(
    english: Option<String>,
    hindi: Option<String>,
) -> Result<Option<Bilingual>, StorageError> {
    match (english, hindi) {
        (None, None) => Ok(None),
        (english, hindi) => Ok(Some(bilingual_from_columns(
            english.unwrap_or_default(),
            hindi.unwrap_or_default(),
        )?)),
    }
}

/// Decodes a JSON array column holding exactly four option strings.
fn option_texts(field: &'static str, json: &str) -> Result<[String; 4], StorageError> {
    let values: Vec<String> = serde_json::from_str(json).map_err(ser)?;
    <[String; 4]>::try_from(values)
        .map_err(|v| StorageError::Serialization(format!("{field} holds {} options", v.len())))
}

/// Encodes the four option renderings of one language as a JSON array.
pub(crate) fn options_to_json(
    question: &Question,
    pick: fn(&Bilingual) -> &str,
) -> Result<String, StorageError> {
    let texts: Vec<&str> = question.options().iter().map(pick).collect();
    serde_json::to_string(&texts).map_err(ser)
}

pub(crate) fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    let prompt = bilingual_from_columns(
        row.try_get::<String, _>("prompt_en").map_err(ser)?,
        row.try_get::<String, _>("prompt_hi").map_err(ser)?,
    )?;

    let english = option_texts(
        "options_en",
        &row.try_get::<String, _>("options_en").map_err(ser)?,
    )?;
    let hindi = option_texts(
        "options_hi",
        &row.try_get::<String, _>("options_hi").map_err(ser)?,
    )?;
    let mut options = Vec::with_capacity(4);
    for (en, hi) in english.into_iter().zip(hindi) {
        options.push(bilingual_from_columns(en, hi)?);
    }
    let options: [Bilingual; 4] = options
        .try_into()
        .map_err(|_| StorageError::Serialization("option pairing failed".into()))?;

    let correct =
        OptionKey::parse(&row.try_get::<String, _>("correct").map_err(ser)?).map_err(ser)?;

    let explanation = optional_bilingual(
        row.try_get::<Option<String>, _>("explanation_en")
            .map_err(ser)?,
        row.try_get::<Option<String>, _>("explanation_hi")
            .map_err(ser)?,
    )?;

    Question::new(
        question_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        prompt,
        options,
        correct,
        explanation,
        row.try_get::<Option<String>, _>("section").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn parse_status(s: &str) -> Result<TestStatus, StorageError> {
    TestStatus::parse(s).map_err(ser)
}
