//! In-memory stores and a recording completion backend for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use nexus_core::defaults::SEARCH_LIMIT;
use nexus_core::{
    CompletionBackend, CreateImageRequest, Error, ImageRef, ImageRepository, Note,
    NoteRepository, Result,
};

/// Note store backed by a vector. Ids start at 1 and grow by one.
#[derive(Default)]
pub struct MemoryNotes {
    notes: Mutex<Vec<Note>>,
    uncapped: bool,
}

impl MemoryNotes {
    pub fn with(seed: Vec<(&str, &str)>) -> Self {
        let notes = seed
            .into_iter()
            .enumerate()
            .map(|(i, (title, body))| Note {
                id: i as i64 + 1,
                title: title.to_string(),
                body: body.to_string(),
            })
            .collect();
        Self {
            notes: Mutex::new(notes),
            uncapped: false,
        }
    }

    /// Let `search` return more than the usual cap.
    pub fn uncapped(mut self) -> Self {
        self.uncapped = true;
        self
    }

    pub fn snapshot(&self) -> Vec<Note> {
        self.notes.lock().unwrap().clone()
    }
}

#[async_trait]
impl NoteRepository for MemoryNotes {
    async fn insert(&self, title: &str, body: &str) -> Result<Note> {
        let mut notes = self.notes.lock().unwrap();
        let id = notes.iter().map(|n| n.id).max().unwrap_or(0) + 1;
        let note = Note {
            id,
            title: title.to_string(),
            body: body.to_string(),
        };
        notes.push(note.clone());
        Ok(note)
    }

    async fn update(&self, note: &Note) -> Result<()> {
        let mut notes = self.notes.lock().unwrap();
        let existing = notes
            .iter_mut()
            .find(|n| n.id == note.id)
            .ok_or(Error::NoteNotFound(note.id))?;
        *existing = note.clone();
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut notes = self.notes.lock().unwrap();
        let before = notes.len();
        notes.retain(|n| n.id != id);
        if notes.len() == before {
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }

    async fn fetch(&self, id: i64) -> Result<Note> {
        self.notes
            .lock()
            .unwrap()
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(Error::NoteNotFound(id))
    }

    async fn search(&self, term: &str) -> Result<Vec<Note>> {
        let mut found: Vec<Note> = self
            .notes
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.matches(term))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.id.cmp(&a.id));
        if !self.uncapped {
            found.truncate(SEARCH_LIMIT as usize);
        }
        Ok(found)
    }

    async fn list_all(&self) -> Result<Vec<Note>> {
        let mut all = self.snapshot();
        all.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(all)
    }
}

/// Image reference store backed by a vector.
#[derive(Default)]
pub struct MemoryImages {
    images: Mutex<Vec<ImageRef>>,
}

impl MemoryImages {
    pub fn with(seed: Vec<(i64, &str, Option<&str>)>) -> Self {
        let images = seed
            .into_iter()
            .enumerate()
            .map(|(i, (note_id, path, description))| ImageRef {
                id: i as i64 + 1,
                note_id,
                path: path.to_string(),
                description: description.map(String::from),
            })
            .collect();
        Self {
            images: Mutex::new(images),
        }
    }
}

#[async_trait]
impl ImageRepository for MemoryImages {
    async fn list_for_note(&self, note_id: i64) -> Result<Vec<ImageRef>> {
        Ok(self
            .images
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.note_id == note_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, req: CreateImageRequest) -> Result<ImageRef> {
        let mut images = self.images.lock().unwrap();
        let image = ImageRef {
            id: images.iter().map(|i| i.id).max().unwrap_or(0) + 1,
            note_id: req.note_id,
            path: req.path,
            description: req.description,
        };
        images.push(image.clone());
        Ok(image)
    }

    async fn fetch(&self, id: i64) -> Result<ImageRef> {
        self.images
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or(Error::ImageNotFound(id))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut images = self.images.lock().unwrap();
        let before = images.len();
        images.retain(|i| i.id != id);
        if images.len() == before {
            return Err(Error::ImageNotFound(id));
        }
        Ok(())
    }
}

/// Completion backend that records prompts and answers from a script.
#[derive(Clone)]
pub struct MockCompletionBackend {
    reply: Arc<dyn Fn() -> Result<String> + Send + Sync>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockCompletionBackend {
    pub fn answering(answer: &str) -> Self {
        let answer = answer.to_string();
        Self {
            reply: Arc::new(move || Ok(answer.clone())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_with_status(status: u16, body: &str) -> Self {
        let body = body.to_string();
        Self {
            reply: Arc::new(move || {
                Err(Error::Upstream {
                    status,
                    body: body.clone(),
                })
            }),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for MockCompletionBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.reply)()
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
