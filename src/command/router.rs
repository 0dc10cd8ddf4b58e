//! Flat command table resolved by longest matching token path.

use std::collections::HashMap;

/// Handlers keyed by `/`-joined token paths (`"today"`, `"create/from-template"`),
/// plus the handler used when nothing matches.
///
/// The table is assembled with [`CommandTable::with`] and only read afterwards.
#[derive(Debug, Clone)]
pub struct CommandTable<H> {
    handlers: HashMap<String, H>,
    default: H,
}

/// A handler picked by [`CommandTable::resolve`] together with the arguments
/// left over after its path.
#[derive(Debug, PartialEq, Eq)]
pub struct Resolved<'t, 'a, H, S> {
    pub handler: &'t H,
    pub path: Option<&'t str>,
    pub args: &'a [S],
}

impl<H> CommandTable<H> {
    #[must_use]
    pub fn new(default: H) -> Self {
        Self {
            handlers: HashMap::new(),
            default,
        }
    }

    #[must_use]
    pub fn with(mut self, path: &str, handler: H) -> Self {
        self.handlers.insert(path.to_string(), handler);
        self
    }

    /// Tries the longest joined prefix of `args` first and drops one token
    /// per attempt. Falls back to the default handler with every argument.
    pub fn resolve<'t, 'a, S: AsRef<str>>(&'t self, args: &'a [S]) -> Resolved<'t, 'a, H, S> {
        for n in (1..=args.len()).rev() {
            let key = args[..n]
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .join("/");
            if let Some((path, handler)) = self.handlers.get_key_value(&key) {
                return Resolved {
                    handler,
                    path: Some(path.as_str()),
                    args: &args[n..],
                };
            }
        }

        Resolved {
            handler: &self.default,
            path: None,
            args,
        }
    }
}

/// Splits a raw command line (`"/mbotc create now"`) into the arguments that
/// follow `trigger`.
///
/// Returns `None` when the line does not start with the trigger or carries no
/// arguments; callers answer those with usage help.
#[must_use]
pub fn split_command_line<'a>(line: &'a str, trigger: &str) -> Option<Vec<&'a str>> {
    let mut tokens = line.split_whitespace();
    if tokens.next()? != trigger {
        return None;
    }
    let args: Vec<&str> = tokens.collect();
    if args.is_empty() { None } else { Some(args) }
}
