//! Command handlers. Each one runs against an initialized [`AppContext`] and
//! writes its human-readable result to `out`.

use std::io::Write;

use anyhow::{bail, Result};
use api::Backend;
use clap::{Args, Subcommand};
use client::{AppContext, PostDraft, PostPatch, ProfileUpdate, Registration, StoreError};
use store::validate::validate_post_draft;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account and log in
    Register(RegisterArgs),
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "POSTBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log out and forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List and edit posts
    #[command(subcommand)]
    Posts(PostCommand),
    /// Update your profile
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        image: Option<String>,
    },
    /// Check whether an email is already registered
    CheckEmail { email: String },
    /// Print the effective configuration
    Config,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub name: String,
    #[arg(long, env = "POSTBOARD_PASSWORD", hide_env_values = true)]
    pub password: String,
    /// Must repeat --password
    #[arg(long)]
    pub confirm_password: String,
    #[arg(long, default_value = "")]
    pub bio: String,
    #[arg(long, default_value = "")]
    pub image: String,
}

#[derive(Subcommand, Debug)]
pub enum PostCommand {
    /// Show all posts, most recent first
    List,
    /// Publish a new post
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "")]
        image_url: String,
    },
    /// Edit one of your posts
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Delete one of your posts
    Delete { id: String },
}

pub async fn run<B: Backend>(app: &AppContext<B>, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Register(args) => register(app, args, out).await,
        Command::Login { email, password } => {
            let user = app.login(&email, &password).await?;
            writeln!(out, "Logged in as {}", user.display_name())?;
            Ok(())
        }
        Command::Logout => {
            app.logout().await?;
            writeln!(out, "Logged out")?;
            Ok(())
        }
        Command::Whoami => {
            match app.session().current_user() {
                Some(user) => writeln!(out, "{} <{}>", user.display_name(), user.email)?,
                None => writeln!(out, "Not logged in")?,
            }
            Ok(())
        }
        Command::Posts(command) => posts(app, command, out).await,
        Command::Profile { name, bio, image } => {
            let update = ProfileUpdate {
                full_name: name,
                bio,
                profile_image: image,
            };
            let user = app.update_profile(&update).await?;
            writeln!(out, "Profile updated for {}", user.display_name())?;
            Ok(())
        }
        Command::CheckEmail { email } => {
            if app.session().check_email_exists(&email).await {
                writeln!(out, "{email} is registered")?;
            } else {
                writeln!(out, "{email} is not registered")?;
            }
            Ok(())
        }
        // Printed by main before a backend is opened
        Command::Config => Ok(()),
    }
}

async fn register<B: Backend>(app: &AppContext<B>, args: RegisterArgs, out: &mut impl Write) -> Result<()> {
    if args.password != args.confirm_password {
        return Err(StoreError::validation("confirmPassword", "Passwords do not match").into());
    }
    let form = Registration {
        email: args.email,
        password: args.password,
        full_name: args.name,
        profile_image: args.image,
        bio: args.bio,
    };
    let user = app.register(&form).await?;
    writeln!(out, "Welcome, {}!", user.display_name())?;
    Ok(())
}

async fn posts<B: Backend>(app: &AppContext<B>, command: PostCommand, out: &mut impl Write) -> Result<()> {
    let posts = app.posts();
    match command {
        PostCommand::List => {
            let list = posts.list();
            if list.is_empty() {
                writeln!(out, "No posts yet")?;
            }
            for post in list {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}",
                    post.id,
                    post.created_at.format("%Y-%m-%d %H:%M"),
                    post.author_name,
                    post.title
                )?;
            }
            Ok(())
        }
        PostCommand::Create {
            title,
            description,
            image_url,
        } => {
            let draft = PostDraft::new(title.trim(), description.trim()).with_image(image_url.trim());
            validate_post_draft(&draft)?;
            let post = posts.create(&draft).await?;
            writeln!(out, "Created {}", post.id)?;
            Ok(())
        }
        PostCommand::Update {
            id,
            title,
            description,
            image_url,
        } => {
            let patch = PostPatch {
                title: title.map(|t| t.trim().to_string()),
                description: description.map(|d| d.trim().to_string()),
                image_url: image_url.map(|i| i.trim().to_string()),
            };
            if patch.is_empty() {
                bail!("Nothing to update: pass --title, --description or --image-url");
            }
            if let Some(existing) = posts.get(&id) {
                ensure_owner(app, &existing.user_id, "edit")?;
                let merged = PostDraft {
                    title: patch.title.clone().unwrap_or(existing.title),
                    description: patch.description.clone().unwrap_or(existing.description),
                    image_url: patch.image_url.clone().unwrap_or(existing.image_url),
                };
                validate_post_draft(&merged)?;
            }
            let post = posts.update(&id, &patch).await?;
            writeln!(out, "Updated {}", post.id)?;
            Ok(())
        }
        PostCommand::Delete { id } => {
            if let Some(existing) = posts.get(&id) {
                ensure_owner(app, &existing.user_id, "delete")?;
            }
            posts.delete(&id).await?;
            writeln!(out, "Deleted {id}")?;
            Ok(())
        }
    }
}

/// Only the author may change a post.
fn ensure_owner<B: Backend>(app: &AppContext<B>, owner_id: &str, action: &str) -> Result<()> {
    match app.session().current_user() {
        Some(user) if user.id != owner_id => bail!("You can only {action} your own posts"),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::LocalBackend;
    use store::MemoryStore;

    type App = AppContext<LocalBackend<MemoryStore>>;

    async fn exec(app: &App, command: Command) -> Result<String> {
        let mut out = Vec::new();
        run(app, command, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn register_args(email: &str, password: &str, confirm: &str) -> Command {
        Command::Register(RegisterArgs {
            email: email.into(),
            name: "Ann".into(),
            password: password.into(),
            confirm_password: confirm.into(),
            bio: String::new(),
            image: String::new(),
        })
    }

    fn create(title: &str, description: &str) -> Command {
        Command::Posts(PostCommand::Create {
            title: title.into(),
            description: description.into(),
            image_url: String::new(),
        })
    }

    #[tokio::test]
    async fn test_register_requires_matching_confirmation() {
        let app = App::new(LocalBackend::new(MemoryStore::new()));
        let err = exec(&app, register_args("ann@x.com", "secret1", "secret2"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
        assert!(!app.session().is_authenticated());

        let out = exec(&app, register_args("ann@x.com", "secret1", "secret1"))
            .await
            .unwrap();
        assert_eq!(out, "Welcome, Ann!\n");
        assert_eq!(exec(&app, Command::Whoami).await.unwrap(), "Ann <ann@x.com>\n");
    }

    #[tokio::test]
    async fn test_post_commands() {
        let app = App::new(LocalBackend::new(MemoryStore::new()));
        exec(&app, register_args("ann@x.com", "secret1", "secret1"))
            .await
            .unwrap();

        let listed = exec(&app, Command::Posts(PostCommand::List)).await.unwrap();
        assert_eq!(listed, "No posts yet\n");

        let err = exec(&app, create("Hi", " ")).await.unwrap_err();
        assert_eq!(err.to_string(), "Please fill in all required fields");

        let err = exec(&app, create("Hi", &"x".repeat(501))).await.unwrap_err();
        assert!(err.to_string().contains("500"));

        assert_eq!(exec(&app, create("Hi", "First")).await.unwrap(), "Created p1\n");

        let update = Command::Posts(PostCommand::Update {
            id: "p1".into(),
            title: Some("Hello".into()),
            description: None,
            image_url: None,
        });
        assert_eq!(exec(&app, update).await.unwrap(), "Updated p1\n");

        let listed = exec(&app, Command::Posts(PostCommand::List)).await.unwrap();
        assert!(listed.starts_with("p1\t"));
        assert!(listed.trim_end().ends_with("\tAnn\tHello"));

        let delete = Command::Posts(PostCommand::Delete { id: "p1".into() });
        assert_eq!(exec(&app, delete).await.unwrap(), "Deleted p1\n");
        assert!(app.posts().is_empty());
    }

    #[tokio::test]
    async fn test_only_author_may_edit() {
        let records = MemoryStore::new();
        let app = App::new(LocalBackend::new(records.clone()));
        exec(&app, register_args("ann@x.com", "secret1", "secret1"))
            .await
            .unwrap();
        exec(&app, create("Hi", "First")).await.unwrap();
        exec(&app, Command::Logout).await.unwrap();

        let bob = Command::Register(RegisterArgs {
            email: "bob@x.com".into(),
            name: "Bob".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            bio: String::new(),
            image: String::new(),
        });
        exec(&app, bob).await.unwrap();

        let delete = Command::Posts(PostCommand::Delete { id: "p1".into() });
        let err = exec(&app, delete).await.unwrap_err();
        assert_eq!(err.to_string(), "You can only delete your own posts");
        assert_eq!(app.posts().len(), 1);
    }

    #[tokio::test]
    async fn test_login_logout_and_check_email() {
        let app = App::new(LocalBackend::new(MemoryStore::new()));
        exec(&app, register_args("ann@x.com", "secret1", "secret1"))
            .await
            .unwrap();
        assert_eq!(exec(&app, Command::Logout).await.unwrap(), "Logged out\n");
        assert_eq!(exec(&app, Command::Whoami).await.unwrap(), "Not logged in\n");

        let login = Command::Login {
            email: "ANN@x.com".into(),
            password: "secret1".into(),
        };
        assert_eq!(exec(&app, login).await.unwrap(), "Logged in as Ann\n");

        let check = Command::CheckEmail {
            email: "ann@x.com".into(),
        };
        assert_eq!(exec(&app, check).await.unwrap(), "ann@x.com is registered\n");

        let profile = Command::Profile {
            name: Some("Ann Lee".into()),
            bio: None,
            image: None,
        };
        assert_eq!(
            exec(&app, profile).await.unwrap(),
            "Profile updated for Ann Lee\n"
        );
    }
}
