//! Question answering and note management over the knowledge base.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use nexus_core::logging::elapsed_ms;
use nexus_core::{
    CompletionBackend, Error, ImageRef, ImageRepository, Note, NoteRepository, Result,
};

use crate::context::build_context;
use crate::prompt::assemble_prompt;
use crate::retrieval::Retriever;

/// Entry point for asking questions and curating notes.
///
/// Every call is independent: the service keeps no per-question state, so
/// overlapping questions run side by side without ordering between them.
#[derive(Clone)]
pub struct KnowledgeService {
    retriever: Retriever,
    notes: Arc<dyn NoteRepository>,
    images: Arc<dyn ImageRepository>,
    completion: Arc<dyn CompletionBackend>,
}

impl KnowledgeService {
    pub fn new(
        notes: Arc<dyn NoteRepository>,
        images: Arc<dyn ImageRepository>,
        completion: Arc<dyn CompletionBackend>,
    ) -> Self {
        Self {
            retriever: Retriever::new(notes.clone()),
            notes,
            images,
            completion,
        }
    }

    /// Answer `question` from the notes that mention it.
    ///
    /// Retrieval, context building and prompt assembly happen in order, then
    /// the prompt goes to the completion backend. Backend errors come back
    /// unchanged.
    #[instrument(skip(self, question), fields(subsystem = "rag", component = "service", op = "answer_question", request_id = %Uuid::now_v7()))]
    pub async fn answer_question(&self, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::InvalidInput("Question must not be blank".to_string()));
        }

        let start = Instant::now();
        let notes = self.retriever.find_relevant(question).await?;
        let images = self.images_by_note(&notes).await?;

        let context = build_context(question, &notes, &images);
        let prompt = assemble_prompt(&context);
        debug!(
            result_count = notes.len(),
            image_count = images.values().map(Vec::len).sum::<usize>(),
            prompt_len = prompt.len(),
            model = self.completion.model_name(),
            "Prompt assembled"
        );

        match self.completion.complete(&prompt).await {
            Ok(answer) => {
                info!(
                    result_count = notes.len(),
                    response_len = answer.len(),
                    duration_ms = elapsed_ms(start),
                    "Question answered"
                );
                Ok(answer)
            }
            Err(e) => {
                error!(error = %e, duration_ms = elapsed_ms(start), "Question failed");
                Err(e)
            }
        }
    }

    /// Run [`answer_question`](Self::answer_question) on a background task.
    ///
    /// Dropping the handle abandons the result; the request itself still
    /// runs to completion.
    pub fn spawn_answer(self: &Arc<Self>, question: impl Into<String>) -> JoinHandle<Result<String>> {
        let service = Arc::clone(self);
        let question = question.into();
        tokio::spawn(async move { service.answer_question(&question).await })
    }

    /// Model answering the questions.
    pub fn model_name(&self) -> &str {
        self.completion.model_name()
    }

    /// Notes to show for a search box: matches for `term`, or all when blank.
    pub async fn notes_for_display(&self, term: &str) -> Result<Vec<Note>> {
        self.retriever.find_relevant(term).await
    }

    /// Images of every note shown for `term`, in note order.
    ///
    /// `term` is trimmed the same way [`answer_question`](Self::answer_question)
    /// trims its question, so both see the same notes.
    pub async fn images_for_query(&self, term: &str) -> Result<Vec<ImageRef>> {
        let mut related = Vec::new();
        for note in self.notes_for_display(term.trim()).await? {
            related.extend(self.images.list_for_note(note.id).await?);
        }
        Ok(related)
    }

    /// Store a new note. Title and body are trimmed before they are stored.
    pub async fn create_note(&self, title: &str, body: &str) -> Result<Note> {
        let (title, body) = (title.trim(), body.trim());
        validate_note_fields(title, body)?;
        let note = self.notes.insert(title, body).await?;
        info!(subsystem = "rag", op = "create_note", note_id = note.id, "Note created");
        Ok(note)
    }

    pub async fn update_note(&self, id: i64, title: &str, body: &str) -> Result<Note> {
        let (title, body) = (title.trim(), body.trim());
        validate_note_fields(title, body)?;
        let note = Note {
            id,
            title: title.to_string(),
            body: body.to_string(),
        };
        self.notes.update(&note).await?;
        info!(subsystem = "rag", op = "update_note", note_id = id, "Note updated");
        Ok(note)
    }

    /// Delete a note and its image references.
    pub async fn delete_note(&self, id: i64) -> Result<()> {
        self.notes.delete(id).await?;
        info!(subsystem = "rag", op = "delete_note", note_id = id, "Note deleted");
        Ok(())
    }

    async fn images_by_note(&self, notes: &[Note]) -> Result<HashMap<i64, Vec<ImageRef>>> {
        let mut by_note = HashMap::with_capacity(notes.len());
        for note in notes {
            let images = self.images.list_for_note(note.id).await?;
            if !images.is_empty() {
                by_note.insert(note.id, images);
            }
        }
        Ok(by_note)
    }
}

fn validate_note_fields(title: &str, body: &str) -> Result<()> {
    if title.is_empty() {
        return Err(Error::InvalidInput("Note title must not be blank".to_string()));
    }
    if body.is_empty() {
        return Err(Error::InvalidInput("Note body must not be blank".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemoryImages, MemoryNotes, MockCompletionBackend};

    struct Fixture {
        service: KnowledgeService,
        notes: Arc<MemoryNotes>,
        backend: MockCompletionBackend,
    }

    fn fixture(
        notes: Vec<(&str, &str)>,
        images: Vec<(i64, &str, Option<&str>)>,
        backend: MockCompletionBackend,
    ) -> Fixture {
        let notes = Arc::new(MemoryNotes::with(notes));
        let service = KnowledgeService::new(
            notes.clone(),
            Arc::new(MemoryImages::with(images)),
            Arc::new(backend.clone()),
        );
        Fixture {
            service,
            notes,
            backend,
        }
    }

    #[tokio::test]
    async fn test_answer_question_end_to_end() {
        let f = fixture(
            vec![("Server reboot", "Restart the service weekly"), ("Groceries", "milk")],
            vec![],
            MockCompletionBackend::answering("Restart weekly as documented."),
        );

        let answer = f.service.answer_question("reboot").await.unwrap();
        assert_eq!(answer, "Restart weekly as documented.");

        let prompts = f.backend.prompts();
        assert_eq!(prompts.len(), 1);
        let prompt = &prompts[0];
        assert!(prompt.starts_with("Você é um assistente"));
        assert!(prompt.contains("Pergunta do usuário: reboot\n"));
        assert!(prompt.contains("Título: Server reboot\nTexto:\nRestart the service weekly\n"));
        assert!(!prompt.contains("Groceries"));
        assert!(!prompt.contains("Imagens ligadas a esta nota"));
    }

    #[tokio::test]
    async fn test_images_of_matched_notes_reach_the_prompt() {
        let f = fixture(
            vec![("Rack", "rack layout"), ("Other", "unrelated")],
            vec![(1, "front.png", Some("rack frontal")), (2, "other.png", None)],
            MockCompletionBackend::answering("ok"),
        );

        f.service.answer_question("rack").await.unwrap();
        let prompt = &f.backend.prompts()[0];
        assert!(prompt.contains(" - Descrição: rack frontal | Caminho local: front.png\n"));
        assert!(!prompt.contains("other.png"));
    }

    #[tokio::test]
    async fn test_no_match_still_asks_with_fallback() {
        let f = fixture(
            vec![("Server reboot", "Restart the service weekly")],
            vec![],
            MockCompletionBackend::answering("Não há registros."),
        );

        let answer = f.service.answer_question("printer").await.unwrap();
        assert_eq!(answer, "Não há registros.");
        assert!(f.backend.prompts()[0].contains("Nenhuma nota relevante encontrada."));
    }

    #[tokio::test]
    async fn test_blank_question_is_rejected_before_backend() {
        let f = fixture(vec![("a", "b")], vec![], MockCompletionBackend::answering("x"));

        let err = f.service.answer_question("  \n ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(f.backend.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_question_is_trimmed() {
        let f = fixture(
            vec![("Server reboot", "x")],
            vec![],
            MockCompletionBackend::answering("ok"),
        );

        f.service.answer_question("  reboot \n").await.unwrap();
        let prompt = &f.backend.prompts()[0];
        assert!(prompt.contains("Pergunta do usuário: reboot\n\n"));
        assert!(prompt.contains("Título: Server reboot"));
    }

    #[tokio::test]
    async fn test_backend_error_propagates_unchanged() {
        let f = fixture(
            vec![("a", "b")],
            vec![],
            MockCompletionBackend::failing_with_status(429, "slow down"),
        );

        match f.service.answer_question("a").await.unwrap_err() {
            Error::Upstream { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "slow down");
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_spawn_answer_runs_in_background() {
        let f = fixture(
            vec![("Server reboot", "x")],
            vec![],
            MockCompletionBackend::answering("done"),
        );
        let service = Arc::new(f.service);

        let first = service.spawn_answer("reboot");
        let second = service.spawn_answer(String::from("server"));
        assert_eq!(first.await.unwrap().unwrap(), "done");
        assert_eq!(second.await.unwrap().unwrap(), "done");
        assert_eq!(f.backend.prompts().len(), 2);
    }

    #[tokio::test]
    async fn test_notes_for_display_blank_lists_all() {
        let f = fixture(
            vec![("a", "one"), ("b", "two")],
            vec![],
            MockCompletionBackend::answering("x"),
        );

        assert_eq!(f.service.notes_for_display("").await.unwrap().len(), 2);
        assert_eq!(f.service.notes_for_display("two").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_images_for_query_follows_note_order() {
        let f = fixture(
            vec![("first rack", "x"), ("second rack", "y")],
            vec![
                (1, "a1.png", None),
                (2, "b1.png", None),
                (1, "a2.png", Some("second of first")),
            ],
            MockCompletionBackend::answering("x"),
        );

        let images = f.service.images_for_query("rack").await.unwrap();
        let paths: Vec<_> = images.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["b1.png", "a1.png", "a2.png"]);
    }

    #[tokio::test]
    async fn test_images_for_query_sees_the_notes_the_answer_used() {
        let f = fixture(
            vec![("first rack", "x"), ("Other", "unrelated")],
            vec![(1, "front.png", Some("rack frontal")), (2, "other.png", None)],
            MockCompletionBackend::answering("ok"),
        );

        f.service.answer_question(" rack ").await.unwrap();
        assert!(f.backend.prompts()[0].contains("front.png"));

        let images = f.service.images_for_query(" rack ").await.unwrap();
        let paths: Vec<_> = images.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["front.png"]);
    }

    #[tokio::test]
    async fn test_note_fields_are_stored_trimmed() {
        let f = fixture(vec![], vec![], MockCompletionBackend::answering("x"));

        let note = f.service.create_note("  Title \n", "\tBody  ").await.unwrap();
        assert_eq!(note.title, "Title");
        assert_eq!(f.notes.snapshot()[0].body, "Body");

        let updated = f.service.update_note(note.id, " New ", "  Text\n").await.unwrap();
        assert_eq!(updated.title, "New");
        let stored = &f.notes.snapshot()[0];
        assert_eq!(stored.title, "New");
        assert_eq!(stored.body, "Text");
    }

    #[tokio::test]
    async fn test_create_update_delete_note() {
        let f = fixture(vec![], vec![], MockCompletionBackend::answering("x"));

        let note = f.service.create_note("Title", "Body").await.unwrap();
        assert!(note.is_persisted());

        f.service.update_note(note.id, "New", "Text").await.unwrap();
        assert_eq!(f.notes.snapshot()[0].title, "New");

        f.service.delete_note(note.id).await.unwrap();
        assert!(f.notes.snapshot().is_empty());
        assert!(matches!(
            f.service.delete_note(note.id).await.unwrap_err(),
            Error::NoteNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_blank_fields_are_rejected() {
        let f = fixture(vec![], vec![], MockCompletionBackend::answering("x"));

        assert!(matches!(
            f.service.create_note(" ", "body").await.unwrap_err(),
            Error::InvalidInput(_)
        ));
        assert!(matches!(
            f.service.create_note("title", "").await.unwrap_err(),
            Error::InvalidInput(_)
        ));
        assert!(matches!(
            f.service.update_note(1, "title", "\n").await.unwrap_err(),
            Error::InvalidInput(_)
        ));
        assert!(f.notes.snapshot().is_empty());
    }
}
