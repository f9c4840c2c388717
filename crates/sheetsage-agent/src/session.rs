//! Dataset session: load once, answer many.
//!
//! Opening a session reads the relation from the store and derives the
//! semantic schema, the knowledge dictionary and the context chunks up front.
//! Each question then costs exactly one completion call.

use sheetsage_core::config::SchemaConfig;
use sheetsage_core::error::{Result, SageError};
use sheetsage_core::types::Relation;
use sheetsage_knowledge::{
    ContextChunks, KnowledgeDictionary, SemanticSchema, build_dictionary, chunk_relation,
    extract_schema,
};
use sheetsage_store::RelationStore;

use crate::answer::{AnswerGenerator, AnswerOutcome};

/// Longest question accepted, in characters.
pub const MAX_QUESTION_CHARS: usize = 200;

pub struct DatasetSession {
    name: String,
    relation: Relation,
    schema: SemanticSchema,
    dictionary: KnowledgeDictionary,
    chunks: ContextChunks,
}

impl DatasetSession {
    pub fn open(store: &RelationStore, name: &str, schema_config: &SchemaConfig) -> Result<Self> {
        let relation = store.load_dataset(name)?;
        Ok(Self::from_relation(name, relation, schema_config))
    }

    pub fn from_relation(name: &str, relation: Relation, schema_config: &SchemaConfig) -> Self {
        let schema = extract_schema(&relation, &schema_config.namespace);
        let dictionary = build_dictionary(&schema);
        let chunks = chunk_relation(&relation);
        tracing::info!(
            "📂 Session '{}' ready: {} rows, {} properties, {} chunks",
            name,
            relation.row_count(),
            schema.len(),
            chunks.len()
        );
        Self {
            name: name.to_string(),
            relation,
            schema,
            dictionary,
            chunks,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn relation(&self) -> &Relation {
        &self.relation
    }

    pub fn schema(&self) -> &SemanticSchema {
        &self.schema
    }

    pub fn dictionary(&self) -> &KnowledgeDictionary {
        &self.dictionary
    }

    pub fn chunks(&self) -> &ContextChunks {
        &self.chunks
    }

    /// Run one question through the pipeline.
    ///
    /// Returns `Ok(None)` without contacting the service when the question is
    /// blank, and `InvalidInput` when it exceeds [`MAX_QUESTION_CHARS`].
    pub async fn ask(
        &self,
        generator: &AnswerGenerator,
        question: &str,
    ) -> Result<Option<AnswerOutcome>> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(None);
        }
        let chars = question.chars().count();
        if chars > MAX_QUESTION_CHARS {
            return Err(SageError::InvalidInput(format!(
                "question is {chars} characters long (limit {MAX_QUESTION_CHARS})"
            )));
        }
        Ok(Some(generator.answer(question, &self.chunks).await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::tests::{StubProvider, reply_with};
    use crate::answer::{AnswerErrorKind, ERROR_MARKER, render_outcome};
    use sheetsage_core::types::Value;

    fn people() -> Relation {
        Relation::from_rows(
            vec!["Name".into(), "Age".into()],
            vec![
                vec!["Ana".into(), Value::Integer(30)],
                vec!["Bo".into(), Value::Null],
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_open_from_store_and_ask() {
        let dir = tempfile::tempdir().unwrap();
        let store = RelationStore::open_at(dir.path()).unwrap();
        store.ingest("people", &people()).unwrap();

        let session = DatasetSession::open(&store, "people", &SchemaConfig::default()).unwrap();
        assert_eq!(session.relation(), &people());
        assert_eq!(session.schema().ids().collect::<Vec<_>>(), vec!["has_name", "has_age"]);
        assert!(session.dictionary().contains_key("name"));
        assert_eq!(session.chunks().len(), 4);

        let stub = StubProvider::new(|| reply_with("Ana"));
        let seen = stub.seen.clone();
        let generator = AnswerGenerator::new(Box::new(stub), "gpt-4-turbo");
        let outcome = session.ask(&generator, "Who is 30?").await.unwrap().unwrap();
        assert_eq!(outcome, Ok("Ana".to_string()));
        assert_eq!(
            seen.lock().unwrap()[0].messages[0].content,
            "[\"Ana\",30,\"Bo\",\"null\"]\n\nWho is 30?"
        );
    }

    #[tokio::test]
    async fn test_blank_question_skips_invocation() {
        let session = DatasetSession::from_relation("people", people(), &SchemaConfig::default());
        let stub = StubProvider::new(|| reply_with("unused"));
        let seen = stub.seen.clone();
        let generator = AnswerGenerator::new(Box::new(stub), "m");

        assert!(session.ask(&generator, "   \n").await.unwrap().is_none());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_long_question_rejected() {
        let session = DatasetSession::from_relation("people", people(), &SchemaConfig::default());
        let stub = StubProvider::new(|| reply_with("unused"));
        let seen = stub.seen.clone();
        let generator = AnswerGenerator::new(Box::new(stub), "m");

        let limit = "é".repeat(MAX_QUESTION_CHARS);
        assert!(session.ask(&generator, &limit).await.unwrap().is_some());

        let too_long = "é".repeat(MAX_QUESTION_CHARS + 1);
        let err = session.ask(&generator, &too_long).await.unwrap_err();
        assert!(matches!(err, SageError::InvalidInput(_)));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_surfaces_marker() {
        let session = DatasetSession::from_relation("people", people(), &SchemaConfig::default());
        let generator = AnswerGenerator::new(
            Box::new(StubProvider::new(|| {
                Err(SageError::Provider("openai API error 401: bad key".into()))
            })),
            "m",
        );
        let outcome = session.ask(&generator, "Who?").await.unwrap().unwrap();
        assert_eq!(outcome.clone().unwrap_err().kind, AnswerErrorKind::RemoteService);
        assert!(render_outcome(&outcome).contains(ERROR_MARKER));
    }

    #[test]
    fn test_open_missing_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let store = RelationStore::open_at(dir.path()).unwrap();
        let err = DatasetSession::open(&store, "ghost", &SchemaConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, SageError::NotFound(_)));
    }
}
