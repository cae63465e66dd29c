//! Context block assembly.
//!
//! Turns the retrieved notes and their images into the grounding text sent
//! to the model. Layout, in order:
//!
//! ```text
//! Pergunta do usuário: <question>
//!
//! Base de conhecimento (notas cadastradas):
//!
//! Título: <title>
//! Texto:
//! <body>
//! Imagens ligadas a esta nota:
//!  - Descrição: <description> | Caminho local: <path>
//!
//! ...
//! ```
//!
//! The image sub-block appears only for notes that have images. Bodies are
//! copied whole, never truncated.

use std::collections::HashMap;
use std::fmt;

use nexus_core::{ImageRef, Note};

const QUESTION_PREFIX: &str = "Pergunta do usuário: ";
const KNOWLEDGE_HEADER: &str = "Base de conhecimento (notas cadastradas):\n\n";
const NO_NOTES_FALLBACK: &str =
    "Nenhuma nota relevante encontrada. Mesmo assim, tente orientar o usuário dizendo que não há registros.\n";
const IMAGES_HEADER: &str = "Imagens ligadas a esta nota:\n";
const MISSING_DESCRIPTION: &str = "(sem descrição)";

/// Grounding text built fresh for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextBlock(String);

impl ContextBlock {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ContextBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the context block for `question` from `notes` in their given order.
///
/// `images` maps note ids to their images; notes missing from the map are
/// treated as having none.
pub fn build_context(
    question: &str,
    notes: &[Note],
    images: &HashMap<i64, Vec<ImageRef>>,
) -> ContextBlock {
    let mut out = String::new();
    out.push_str(QUESTION_PREFIX);
    out.push_str(question);
    out.push_str("\n\n");
    out.push_str(KNOWLEDGE_HEADER);

    if notes.is_empty() {
        out.push_str(NO_NOTES_FALLBACK);
        return ContextBlock(out);
    }

    for note in notes {
        out.push_str("Título: ");
        out.push_str(&note.title);
        out.push('\n');
        out.push_str("Texto:\n");
        out.push_str(&note.body);
        out.push('\n');

        if let Some(attached) = images.get(&note.id).filter(|list| !list.is_empty()) {
            out.push_str(IMAGES_HEADER);
            for image in attached {
                out.push_str(" - Descrição: ");
                let description = image
                    .description
                    .as_deref()
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or(MISSING_DESCRIPTION);
                out.push_str(description);
                out.push_str(" | Caminho local: ");
                out.push_str(&image.path);
                out.push('\n');
            }
        }
        out.push('\n');
    }

    ContextBlock(out)
}
