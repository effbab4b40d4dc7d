use std::path::PathBuf;

use brdgen::api::UploadCategory;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct RunOptions {
    pub(super) email: String,
    pub(super) password: String,
    pub(super) project: String,
    pub(super) emails: Option<PathBuf>,
    pub(super) transcripts: Option<PathBuf>,
    pub(super) chat_log: Option<PathBuf>,
    /// Skip presentation delays.
    pub(super) fast: bool,
    /// Force offline demo identities on failed sign-in.
    pub(super) demo: bool,
}

impl RunOptions {
    pub(super) fn file(&self, category: UploadCategory) -> Option<&PathBuf> {
        match category {
            UploadCategory::Emails => self.emails.as_ref(),
            UploadCategory::Transcripts => self.transcripts.as_ref(),
            UploadCategory::ChatLog => self.chat_log.as_ref(),
        }
    }
}

/// `Ok(None)` means help was printed.
pub(super) fn parse_args(args: Vec<String>) -> Result<Option<RunOptions>, String> {
    let mut options = RunOptions {
        email: String::new(),
        password: String::new(),
        project: String::new(),
        emails: None,
        transcripts: None,
        chat_log: None,
        fast: false,
        demo: false,
    };
    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        match flag {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--fast" => options.fast = true,
            "--demo" => options.demo = true,
            "--email" => options.email = value_after(&args, &mut idx, flag)?,
            "--password" => options.password = value_after(&args, &mut idx, flag)?,
            "--project" => options.project = value_after(&args, &mut idx, flag)?,
            "--emails" => options.emails = Some(PathBuf::from(value_after(&args, &mut idx, flag)?)),
            "--transcripts" => {
                options.transcripts = Some(PathBuf::from(value_after(&args, &mut idx, flag)?));
            }
            "--slack" => {
                options.chat_log = Some(PathBuf::from(value_after(&args, &mut idx, flag)?));
            }
            _ => return Err(format!("Unknown argument: {flag}\n\n{}", help_text())),
        }
        idx += 1;
    }
    if options.email.is_empty() || options.password.is_empty() {
        return Err(format!("--email and --password are required\n\n{}", help_text()));
    }
    Ok(Some(options))
}

fn value_after(args: &[String], idx: &mut usize, flag: &str) -> Result<String, String> {
    *idx += 1;
    args.get(*idx)
        .cloned()
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn help_text() -> &'static str {
    "Usage: brdgen-run --email EMAIL --password PASSWORD [--project NAME]\n\
     \x20                 [--emails FILE] [--transcripts FILE] [--slack FILE]\n\
     \x20                 [--fast] [--demo]\n\
     \n\
     Signs in, runs the processing pipeline against the configured backend and\n\
     prints the resulting Intelligence Center summary."
}
