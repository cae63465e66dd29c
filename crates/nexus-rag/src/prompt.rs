//! Instruction template wrapped around the context block.
//!
//! The result is plain readable text. Escaping for the wire happens in the
//! completion client, not here.

use crate::context::ContextBlock;

/// Fixed instructions placed ahead of the context.
pub const INSTRUCTIONS: &str = "\
Você é um assistente treinado em cima dessas notas e descrições de imagens.
Use APENAS essas informações para responder.
Quando for útil, mencione as imagens pelas descrições (por exemplo: \"na imagem de X...\" ),
mas não invente imagens que não foram listadas.
Explique de forma clara, organizada, em tópicos se fizer sentido.
Se faltar informação, deixe isso explícito.
";

/// Final user-turn content for a question.
pub fn assemble_prompt(context: &ContextBlock) -> String {
    format!("{}\n{}\n", INSTRUCTIONS, context)
}
