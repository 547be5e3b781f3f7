use std::fs;
use std::io;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use posts_client::{Post, PostInput, PostsClient, PostsClientError};
use uuid::Uuid;

const TOKEN_FILE: &str = ".posts_token";
const DEFAULT_HTTP_SERVER: &str = "http://127.0.0.1:8080";

#[derive(Debug, Parser)]
#[command(name = "posts-cli", version, about = "CLI клиент для posts-server")]
struct Cli {
    /// Адрес HTTP-сервера.
    #[arg(long, global = true)]
    server: Option<String>,

    /// JWT-токен; по умолчанию берётся из POSTS_TOKEN или файла .posts_token.
    #[arg(long, global = true, env = "POSTS_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Проверка доступности сервиса.
    Probe,
    /// Сохранить токен в .posts_token для следующих вызовов.
    SaveToken {
        #[arg(long)]
        value: String,
    },
    /// Список всех постов, новые первыми.
    List,
    /// Получение поста по id.
    Get {
        #[arg(long)]
        id: Uuid,
    },
    /// Создание поста (требует токен).
    Create {
        #[arg(long)]
        text: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Удаление своего поста (требует токен).
    Delete {
        #[arg(long)]
        id: Uuid,
    },
    /// Лайк поста (требует токен).
    Like {
        #[arg(long)]
        id: Uuid,
    },
    /// Снять лайк (требует токен).
    Unlike {
        #[arg(long)]
        id: Uuid,
    },
    /// Комментарий к посту (требует токен).
    Comment {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        text: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Удаление комментария (требует токен).
    Uncomment {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        comment_id: Uuid,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let server = normalize_server(cli.server.unwrap_or_else(|| DEFAULT_HTTP_SERVER.to_string()));
    let mut client = PostsClient::new(server).map_err(map_client_error)?;

    let token = match cli.token.as_deref().and_then(parse_token_content) {
        Some(token) => Some(token),
        None => load_token().context("не удалось прочитать .posts_token")?,
    };
    if let Some(token) = token {
        client.set_token(token);
    }

    match cli.command {
        Command::Probe => {
            let msg = client.probe().await.map_err(map_client_error)?;
            println!("{msg}");
        }
        Command::SaveToken { value } => {
            let token = parse_token_content(&value).context("токен не должен быть пустым")?;
            fs::write(TOKEN_FILE, token).context("не удалось сохранить токен")?;
            println!("Токен сохранён в {TOKEN_FILE}");
        }
        Command::List => {
            let posts = client.list_posts().await.map_err(map_client_error)?;
            print_list(&posts);
        }
        Command::Get { id } => {
            let post = client.get_post(id).await.map_err(map_client_error)?;
            print_post("Пост", &post);
        }
        Command::Create { text, name, avatar } => {
            let input = PostInput { text, name, avatar };
            let post = client.create_post(&input).await.map_err(map_client_error)?;
            print_post("Пост создан", &post);
        }
        Command::Delete { id } => {
            client.delete_post(id).await.map_err(map_client_error)?;
            println!("Пост удалён: id={id}");
        }
        Command::Like { id } => {
            let post = client.like_post(id).await.map_err(map_client_error)?;
            print_post("Лайк поставлен", &post);
        }
        Command::Unlike { id } => {
            let post = client.unlike_post(id).await.map_err(map_client_error)?;
            print_post("Лайк снят", &post);
        }
        Command::Comment {
            id,
            text,
            name,
            avatar,
        } => {
            let input = PostInput { text, name, avatar };
            let post = client
                .add_comment(id, &input)
                .await
                .map_err(map_client_error)?;
            print_post("Комментарий добавлен", &post);
        }
        Command::Uncomment { id, comment_id } => {
            let post = client
                .delete_comment(id, comment_id)
                .await
                .map_err(map_client_error)?;
            print_post("Комментарий удалён", &post);
        }
    }

    Ok(())
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn parse_token_content(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn load_token() -> io::Result<Option<String>> {
    if !Path::new(TOKEN_FILE).exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(TOKEN_FILE)?;
    Ok(parse_token_content(&raw))
}

fn map_client_error(err: PostsClientError) -> anyhow::Error {
    let message = match err {
        PostsClientError::MissingToken => {
            "требуется токен: передайте --token, POSTS_TOKEN или `posts-cli save-token ...`"
                .to_string()
        }
        PostsClientError::Unauthorized(message) => format!("доступ запрещён: {message}"),
        PostsClientError::NotFound(message) => format!("не найдено: {message}"),
        PostsClientError::Rejected { status, errors } => {
            let details = errors
                .iter()
                .map(|(key, message)| format!("{key}: {message}"))
                .collect::<Vec<_>>()
                .join("; ");
            format!("запрос отклонён ({status}): {details}")
        }
        PostsClientError::Http(err) => format!("ошибка HTTP: {err}"),
    };
    anyhow::anyhow!(message)
}

fn print_post(title: &str, post: &Post) {
    println!("{title}");
    println!("id: {}", post.id);
    println!("text: {}", post.text);
    if let Some(name) = &post.name {
        println!("name: {name}");
    }
    println!("user: {}", post.user);
    println!("date: {}", post.date);
    println!("likes: {}", post.likes.len());
    println!("comments: {}", post.comments.len());
    for comment in &post.comments {
        println!(
            "  - [{}] {} (user={}, {})",
            comment.id, comment.text, comment.user, comment.created_at
        );
    }
}

fn print_list(posts: &[Post]) {
    println!("Постов: {}", posts.len());

    for post in posts {
        println!(
            "- [{}] {} (user={}, likes={}, comments={})",
            post.id,
            post.text,
            post.user,
            post.likes.len(),
            post.comments.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_server_keeps_scheme() {
        let s = normalize_server("https://example.com:8080".to_string());
        assert_eq!(s, "https://example.com:8080");
    }

    #[test]
    fn normalize_server_adds_http_scheme() {
        let s = normalize_server("127.0.0.1:8080".to_string());
        assert_eq!(s, "http://127.0.0.1:8080");
    }

    #[test]
    fn parse_token_content_trims_whitespace() {
        let token = parse_token_content("  abc.def.ghi  ");
        assert_eq!(token.as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn parse_token_content_rejects_blank() {
        assert!(parse_token_content("   ").is_none());
    }

    #[test]
    fn comment_command_parses_ids() {
        let id = Uuid::new_v4();
        let id_arg = id.to_string();
        let cli = Cli::try_parse_from([
            "posts-cli",
            "comment",
            "--id",
            id_arg.as_str(),
            "--text",
            "a fine comment",
        ])
        .expect("must parse");

        match cli.command {
            Command::Comment { id: parsed, text, name, .. } => {
                assert_eq!(parsed, id);
                assert_eq!(text, "a fine comment");
                assert!(name.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn invalid_uuid_is_rejected_by_parser() {
        let parsed = Cli::try_parse_from(["posts-cli", "get", "--id", "nope"]);
        assert!(parsed.is_err());
    }
}
