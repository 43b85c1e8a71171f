use anyhow::{Context, Result, bail};
use dialoguer::{Input, Password};
use pageidmap_domain::{OutputFormat, PageRecord, RenderConfig};
use pageidmap_engine::{map_records, render, write_rendered};
use pageidmap_source::mysql_source::DEFAULT_CHARSET;
use pageidmap_source::{
    AppConfig, DelimitedSource, MysqlAddress, MysqlOptions, MysqlSource, PageSource, SqliteSource,
    parse_space_keys,
};
use secrecy::SecretString;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub struct MapArgs {
    pub file: Option<PathBuf>,
    pub database: Option<String>,
    pub sqlite: Option<PathBuf>,
    pub spaces: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub target_domain: Option<String>,
    pub output: Option<PathBuf>,
}

enum PageInput {
    File(PathBuf),
    Mysql {
        login: MysqlLogin,
        space_keys: Vec<String>,
    },
    Sqlite {
        path: PathBuf,
        space_keys: Vec<String>,
    },
}

/// Connection details before any prompting. Missing credentials are asked
/// for on the terminal.
struct MysqlLogin {
    address: MysqlAddress,
    user: Option<String>,
    password: Option<String>,
    charset: String,
}

impl MysqlLogin {
    fn into_options(self) -> Result<MysqlOptions> {
        let user = match self.user {
            Some(user) => user,
            None => Input::<String>::new()
                .with_prompt("Database username")
                .interact_text()
                .context("Failed to read database username")?,
        };
        let user = user.trim().to_string();
        if user.is_empty() {
            bail!("Database username cannot be empty");
        }

        let password = match self.password {
            Some(password) => password,
            None => Password::new()
                .with_prompt("Database password")
                .allow_empty_password(true)
                .interact()
                .context("Failed to read database password")?,
        };

        Ok(MysqlOptions {
            address: self.address,
            user,
            password: SecretString::new(password.into()),
            charset: self.charset,
        })
    }
}

pub fn run(args: MapArgs, config: &AppConfig, silent: bool) -> Result<()> {
    let render_config = RenderConfig {
        format: args.output_format.unwrap_or(config.processing.output_format),
        target_domain: args
            .target_domain
            .clone()
            .or_else(|| config.processing.target_domain.clone()),
        silent,
    };
    // Checked before the source is opened so a bad request emits nothing.
    render_config.validate()?;

    let input = resolve_input(&args, config)?;
    let mut mapped = 0usize;
    match &args.output {
        Some(path) => {
            let mut staged = stage_output(path)?;
            let mut sink = BufWriter::new(staged.as_file_mut());
            read_input(input, &render_config, &mut sink, &mut mapped)?;
            drop(sink);
            staged
                .persist(path)
                .with_context(|| format!("Failed to write output file '{}'", path.display()))?;
        }
        None => {
            let mut stdout = BufWriter::new(std::io::stdout().lock());
            read_input(input, &render_config, &mut stdout, &mut mapped)?;
        }
    }

    if mapped == 0 {
        tracing::warn!("No URL mappings generated");
    }
    tracing::info!(format = %render_config.format, "Generated {} URL mappings", mapped);
    Ok(())
}

/// Output goes to a temporary file beside `path` that only replaces it once
/// the run succeeds.
fn stage_output(path: &Path) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create output file '{}'", path.display()))?;

    // Temp files are created 0600.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .with_context(|| format!("Failed to create output file '{}'", path.display()))?;
    }

    Ok(staged)
}

fn resolve_input(args: &MapArgs, config: &AppConfig) -> Result<PageInput> {
    if let Some(path) = &args.file {
        return Ok(PageInput::File(path.clone()));
    }

    if let Some(database) = &args.database {
        let settings = config.database.as_ref();
        let login = MysqlLogin {
            address: MysqlAddress::parse(database)?,
            user: settings.map(|s| s.user.clone()).filter(|u| !u.is_empty()),
            password: settings.and_then(|s| s.password()).map(str::to_string),
            charset: settings.map_or_else(|| DEFAULT_CHARSET.to_string(), |s| s.charset.clone()),
        };
        return Ok(PageInput::Mysql {
            login,
            space_keys: space_keys(args, config)?,
        });
    }

    if let Some(path) = &args.sqlite {
        return Ok(PageInput::Sqlite {
            path: path.clone(),
            space_keys: space_keys(args, config)?,
        });
    }

    if let Some(settings) = &config.database {
        if settings.database.is_empty() {
            bail!("The [database] section has no database name");
        }
        let login = MysqlLogin {
            address: settings.address(),
            user: Some(settings.user.clone()).filter(|u| !u.is_empty()),
            password: settings.password().map(str::to_string),
            charset: settings.charset.clone(),
        };
        return Ok(PageInput::Mysql {
            login,
            space_keys: space_keys(args, config)?,
        });
    }

    if let Some(snapshot) = &config.snapshot {
        return Ok(PageInput::Sqlite {
            path: snapshot.path.clone(),
            space_keys: space_keys(args, config)?,
        });
    }

    bail!("Either --file, --database, --sqlite, or a config file with a [database] or [snapshot] section is required")
}

fn space_keys(args: &MapArgs, config: &AppConfig) -> Result<Vec<String>> {
    let space_keys = match &args.spaces {
        Some(spaces) => parse_space_keys(spaces),
        None => parse_space_keys(&config.processing.default_spaces.join(",")),
    };
    if space_keys.is_empty() {
        bail!("No space keys given");
    }
    Ok(space_keys)
}

fn read_input(
    input: PageInput,
    config: &RenderConfig,
    sink: &mut dyn Write,
    mapped: &mut usize,
) -> Result<()> {
    match input {
        PageInput::File(path) => {
            let mut source = DelimitedSource::new(&path);
            stream(&mut source, config, sink, mapped)
                .with_context(|| format!("Error reading file '{}'", path.display()))
        }
        PageInput::Sqlite { path, space_keys } => {
            let mut source = SqliteSource::new(&path, space_keys);
            stream(&mut source, config, sink, mapped)
                .with_context(|| format!("Database error on '{}'", path.display()))
        }
        PageInput::Mysql { login, space_keys } => {
            let options = login.into_options()?;
            let address = options.address.to_string();
            let mut source = MysqlSource::new(options, space_keys);
            stream(&mut source, config, sink, mapped)
                .with_context(|| format!("Database error on '{address}'"))
        }
    }
}

fn stream<S: PageSource>(
    source: &mut S,
    config: &RenderConfig,
    sink: &mut dyn Write,
    mapped: &mut usize,
) -> Result<()> {
    let written = source.scan(|records| emit(records, config, sink, mapped))??;
    tracing::debug!(fragments = written, "Output flushed");
    Ok(())
}

fn emit(
    records: &mut dyn Iterator<Item = PageRecord>,
    config: &RenderConfig,
    sink: &mut dyn Write,
    mapped: &mut usize,
) -> Result<usize> {
    let results = map_records(records).inspect(|_| *mapped += 1);
    let rendered = render(results, config)?;
    write_rendered(rendered, sink).context("Failed to write output")
}
