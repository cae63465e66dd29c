//! Command handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use nexus_core::{CreateImageRequest, Error, ImageRef, ImageRepository, Note, NoteRepository};
use nexus_db::file_storage::resolve;
use nexus_db::{Database, ImageFileStore};
use nexus_inference::{OpenAIClient, UpstreamErrorCode};
use nexus_rag::KnowledgeService;

use crate::config::AppConfig;
use crate::{Cli, Commands, ImageAddArgs, ImageCommands};

struct App {
    db: Database,
    files: ImageFileStore,
    service: Arc<KnowledgeService>,
    json: bool,
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let db = Database::connect(&config.database_url)
        .await
        .with_context(|| format!("opening {}", config.database_url))?;
    let client = OpenAIClient::new(config.completion.clone())?;
    let service = Arc::new(KnowledgeService::new(
        Arc::new(db.notes.clone()),
        Arc::new(db.images.clone()),
        Arc::new(client),
    ));
    let app = App {
        db,
        files: ImageFileStore::new(config.images_dir.clone()),
        service,
        json: cli.json,
    };

    match cli.command {
        Commands::Ask { question } => app.ask(question).await,
        Commands::List { term } => app.list(term.as_deref().unwrap_or("")).await,
        Commands::Show { id } => app.show(id).await,
        Commands::Add {
            title,
            body,
            image,
            description,
        } => app.add(&title, &body, &image, &description).await,
        Commands::Edit { id, title, body } => app.edit(id, title, body).await,
        Commands::Delete { id } => app.delete(id).await,
        Commands::Image(ImageCommands::Add(args)) => app.image_add(args).await,
        Commands::Image(ImageCommands::List { note_id }) => app.image_list(note_id).await,
        Commands::Image(ImageCommands::Rm { image_id }) => app.image_rm(image_id).await,
    }
}

/// Operator hint for failures that have an obvious fix.
pub fn hint_for(err: &anyhow::Error) -> Option<&'static str> {
    match err.downcast_ref::<Error>()? {
        Error::Upstream { status, body } => {
            Some(UpstreamErrorCode::from_response(*status, body).hint())
        }
        Error::Config(_) => Some("set OPENAI_API_KEY in the environment or a .env file"),
        Error::Transport(_) => Some("check network access and OPENAI_BASE_URL"),
        _ => None,
    }
}

impl App {
    async fn ask(&self, question: String) -> anyhow::Result<()> {
        if !self.json {
            eprintln!("Asking {}...", self.service.model_name());
        }
        let question = question.trim().to_string();
        let answer = self.service.spawn_answer(question.as_str()).await??;
        let images = self.service.images_for_query(&question).await?;

        if self.json {
            return print_json(&json!({ "answer": answer, "images": images }));
        }
        println!("{}", answer);
        if !images.is_empty() {
            println!("\nRelated images:");
            for image in &images {
                println!("  [{}] {}", image.id, image);
            }
        }
        Ok(())
    }

    async fn list(&self, term: &str) -> anyhow::Result<()> {
        let notes = self.service.notes_for_display(term).await?;
        if self.json {
            return print_json(&notes);
        }
        if notes.is_empty() {
            println!("No notes found.");
        }
        for note in &notes {
            println!("{:>5}  {}", note.id, note.title);
        }
        Ok(())
    }

    async fn show(&self, id: i64) -> anyhow::Result<()> {
        let note = self.db.notes.fetch(id).await?;
        let images = self.db.images.list_for_note(id).await?;
        if self.json {
            return print_json(&json!({ "note": note, "images": images }));
        }
        print_note(&note);
        print_images(&images)
    }

    async fn add(
        &self,
        title: &str,
        body: &str,
        images: &[PathBuf],
        descriptions: &[String],
    ) -> anyhow::Result<()> {
        if descriptions.len() > images.len() {
            bail!("{} descriptions given for {} images", descriptions.len(), images.len());
        }
        for path in images {
            if !path.is_file() {
                bail!("Image file does not exist: {}", path.display());
            }
        }

        let note = self.service.create_note(title, body).await?;
        let mut attached = Vec::with_capacity(images.len());
        for (i, path) in images.iter().enumerate() {
            let image = self
                .attach(note.id, path, descriptions.get(i).cloned())
                .await?;
            attached.push(image);
        }

        if self.json {
            return print_json(&json!({ "note": note, "images": attached }));
        }
        println!("Created note {}", note.id);
        for image in &attached {
            println!("Attached image {}: {}", image.id, image.path);
        }
        Ok(())
    }

    async fn edit(&self, id: i64, title: Option<String>, body: Option<String>) -> anyhow::Result<()> {
        if title.is_none() && body.is_none() {
            bail!("Nothing to change: pass --title and/or --body");
        }
        let current = self.db.notes.fetch(id).await?;
        let note = self
            .service
            .update_note(
                id,
                title.as_deref().unwrap_or(&current.title),
                body.as_deref().unwrap_or(&current.body),
            )
            .await?;

        if self.json {
            return print_json(&note);
        }
        println!("Updated note {}", note.id);
        Ok(())
    }

    async fn delete(&self, id: i64) -> anyhow::Result<()> {
        self.service.delete_note(id).await?;
        if self.json {
            return print_json(&json!({ "deleted": id }));
        }
        println!("Deleted note {}", id);
        Ok(())
    }

    async fn image_add(&self, args: ImageAddArgs) -> anyhow::Result<()> {
        self.db.notes.fetch(args.note_id).await?;
        let image = self
            .attach(args.note_id, &args.path, args.description)
            .await?;

        if self.json {
            return print_json(&image);
        }
        println!("Attached image {} to note {}: {}", image.id, image.note_id, image.path);
        Ok(())
    }

    async fn image_list(&self, note_id: i64) -> anyhow::Result<()> {
        self.db.notes.fetch(note_id).await?;
        let images = self.db.images.list_for_note(note_id).await?;
        if self.json {
            return print_json(&images);
        }
        if images.is_empty() {
            println!("No images attached to note {}.", note_id);
            return Ok(());
        }
        print_images(&images)
    }

    async fn image_rm(&self, image_id: i64) -> anyhow::Result<()> {
        let image = self.db.images.fetch(image_id).await?;
        self.db.images.delete(image_id).await?;
        self.files.remove(&image.path).await?;

        if self.json {
            return print_json(&json!({ "deleted": image_id, "path": image.path }));
        }
        println!("Removed image {} ({})", image_id, image.path);
        Ok(())
    }

    async fn attach(
        &self,
        note_id: i64,
        source: &Path,
        description: Option<String>,
    ) -> anyhow::Result<ImageRef> {
        let stored = self.files.import(source, note_id).await?;
        let image = self
            .db
            .images
            .insert(CreateImageRequest {
                note_id,
                path: stored,
                description: clean_description(description),
            })
            .await?;
        debug!(subsystem = "cli", note_id, image_id = image.id, "Image attached");
        Ok(image)
    }
}

/// Trimmed image description, or `None` when nothing is left.
fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_note(note: &Note) {
    println!("#{} {}", note.id, note.title);
    println!();
    println!("{}", note.body);
}

fn print_images(images: &[ImageRef]) -> anyhow::Result<()> {
    if images.is_empty() {
        return Ok(());
    }
    println!();
    println!("Images:");
    for image in images {
        let location = resolve(&image.path)?;
        match image.described() {
            Some(description) => {
                println!("  [{}] {} ({})", image.id, description, location.display())
            }
            None => println!("  [{}] {}", image.id, location.display()),
        }
    }
    Ok(())
}
