use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use kit::areas::repository::Repository;
use kit::artifacts::objects::object_type::ObjectType;
use kit::commands::plumbing::cat_file::CatFileMode;
use kit::commands::plumbing::hash_object::hash_object;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "KIT_LOG";

#[derive(Parser)]
#[command(
    name = "kit",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A small Git-compatible version control tool",
    long_about = "kit reads and writes Git repositories: loose objects, the index, \
    references and ignore files. Set KIT_LOG to control diagnostic output.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path. \
        Re-running it on an existing repository leaves existing files untouched."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file as an object and optionally write it to the object database"
    )]
    HashObject {
        #[arg(short = 't', long = "type", default_value = "blob", help = "The object type")]
        object_type: ObjectType,
        #[arg(short, long, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(
        name = "cat-file",
        about = "Print the content, type or size of an object",
        long_about = "With -p, -t or -s the single argument names the object. \
        Otherwise the first argument is the expected type and the second names the object; \
        tags and commits are followed until an object of that type is reached."
    )]
    CatFile {
        #[arg(short = 'p', help = "Pretty-print the object", conflicts_with_all = ["show_type", "show_size"])]
        pretty: bool,
        #[arg(short = 't', help = "Print the object type", conflicts_with = "show_size")]
        show_type: bool,
        #[arg(short = 's', help = "Print the object size")]
        show_size: bool,
        #[arg(index = 1)]
        first: String,
        #[arg(index = 2)]
        second: Option<String>,
    },
    #[command(name = "ls-tree", about = "List the contents of a tree object")]
    LsTree {
        #[arg(short, help = "Recurse into subtrees")]
        recursive: bool,
        #[arg(index = 1, help = "A tree, commit or tag")]
        object: String,
    },
    #[command(name = "ls-files", about = "List the paths in the index")]
    LsFiles {
        #[arg(short, long, help = "Show index version and per-entry details")]
        verbose: bool,
    },
    #[command(name = "rev-parse", about = "Resolve a name to an object id")]
    RevParse {
        #[arg(long = "type", help = "Follow tags and commits to an object of this type")]
        object_type: Option<ObjectType>,
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "check-ignore",
        about = "Print the paths that are excluded by ignore rules",
        long_about = "Exits with status 1 when none of the paths is ignored."
    )]
    CheckIgnore {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    #[command(name = "add", about = "Add files and directories to the index")]
    Add {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "The author is read from GIT_AUTHOR_NAME, GIT_AUTHOR_EMAIL and optionally GIT_AUTHOR_DATE."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "log",
        about = "Show the commit history",
        long_about = "Follows first parents from the given revision (HEAD by default) down to the root commit."
    )]
    Log {
        #[arg(long, help = "Print one `<short id> <subject>` line per commit")]
        oneline: bool,
        #[arg(index = 1, default_value = "HEAD")]
        revision: String,
    },
    #[command(
        name = "tag",
        about = "List tags, or create one",
        long_about = "Without a name all tags are listed. With -a or -m an annotated tag object is written."
    )]
    Tag {
        #[arg(short, help = "Create an annotated tag")]
        annotate: bool,
        #[arg(short, long, help = "The tag message")]
        message: Option<String>,
        #[arg(index = 1)]
        name: Option<String>,
        #[arg(index = 2, default_value = "HEAD")]
        object: String,
    },
    #[command(name = "status", about = "Show the working tree status")]
    Status {
        #[arg(short = 's', long = "porcelain", help = "Print one `XY path` line per change")]
        porcelain: bool,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_repository() -> Result<Repository> {
    let pwd = std::env::current_dir().context("unable to read current directory")?;

    Repository::find_repository_root(&pwd)?
        .with_context(|| format!("not a git repository: {}", pwd.display()))
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Init { path } => {
            let path = match path {
                Some(path) => path,
                None => std::env::current_dir()?,
            };
            Repository::init_at(&path, &mut stdout)?;
        }
        Commands::HashObject {
            object_type,
            write,
            file,
        } => {
            let repository = if write {
                Some(open_repository()?)
            } else {
                None
            };
            hash_object(repository.as_ref(), &file, object_type, write, &mut stdout)?
        }
        Commands::CatFile {
            pretty,
            show_type,
            show_size,
            first,
            second,
        } => {
            let (mode, name) = match (pretty, show_type, show_size, second) {
                (true, _, _, None) => (CatFileMode::Pretty, first),
                (_, true, _, None) => (CatFileMode::Type, first),
                (_, _, true, None) => (CatFileMode::Size, first),
                (false, false, false, Some(name)) => {
                    (CatFileMode::Body(first.parse::<ObjectType>()?), name)
                }
                _ => anyhow::bail!("usage: cat-file (-p | -t | -s) <object> | cat-file <type> <object>"),
            };
            open_repository()?.cat_file(&name, mode, &mut stdout)?
        }
        Commands::LsTree { recursive, object } => {
            open_repository()?.ls_tree(&object, recursive, &mut stdout)?
        }
        Commands::LsFiles { verbose } => open_repository()?.ls_files(verbose, &mut stdout)?,
        Commands::RevParse { object_type, name } => {
            open_repository()?.rev_parse(&name, object_type, &mut stdout)?
        }
        Commands::CheckIgnore { paths } => {
            let ignored = open_repository()?.check_ignore(&paths, &mut stdout)?;
            if ignored == 0 {
                std::process::exit(1);
            }
        }
        Commands::Add { paths } => open_repository()?.add(&paths)?,
        Commands::Commit { message } => open_repository()?.commit_index(&message, &mut stdout)?,
        Commands::Log { oneline, revision } => {
            open_repository()?.log(&revision, oneline, &mut stdout)?
        }
        Commands::Tag {
            annotate,
            message,
            name,
            object,
        } => {
            let repository = open_repository()?;
            match name {
                Some(name) => repository.tag(&name, &object, annotate, message)?,
                None => repository.list_tags(&mut stdout)?,
            }
        }
        Commands::Status { porcelain } => {
            open_repository()?.print_status(porcelain, &mut stdout)?
        }
    }

    Ok(())
}
