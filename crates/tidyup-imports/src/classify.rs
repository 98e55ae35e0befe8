//! Module path classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of module a path refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleClass {
    /// Runtime built-in (`fs`, `node:path`).
    Node,
    /// Package dependency.
    External,
    /// Project alias (`#db`, `~/lib`).
    Internal,
    /// Absolute filesystem path.
    Absolute,
    /// Relative filesystem path.
    Relative,
}

impl ModuleClass {
    /// Default group order.
    pub const DEFAULT_ORDER: [ModuleClass; 5] = [
        ModuleClass::Node,
        ModuleClass::External,
        ModuleClass::Internal,
        ModuleClass::Absolute,
        ModuleClass::Relative,
    ];

    /// Uppercase label used in messages.
    pub fn label(&self) -> &'static str {
        match self {
            ModuleClass::Node => "NODE",
            ModuleClass::External => "EXTERNAL",
            ModuleClass::Internal => "INTERNAL",
            ModuleClass::Absolute => "ABSOLUTE",
            ModuleClass::Relative => "RELATIVE",
        }
    }
}

impl fmt::Display for ModuleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Default prefixes that mark a path as internal.
pub const DEFAULT_INTERNAL_PREFIXES: [&str; 3] = ["#", "~/", "@/"];

const BUILTINS: &[&str] = &[
    "_http_agent",
    "_http_client",
    "_http_common",
    "_http_incoming",
    "_http_outgoing",
    "_http_server",
    "_stream_duplex",
    "_stream_passthrough",
    "_stream_readable",
    "_stream_transform",
    "_stream_wrap",
    "_stream_writable",
    "_tls_common",
    "_tls_wrap",
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// First path segment of a module path. A leading `/` is kept, so
/// `/foo/bar` gives `/foo` and `/` gives `/`.
pub fn module_name(path: &str) -> &str {
    if let Some(rest) = path.strip_prefix('/') {
        return match rest.find('/') {
            Some(i) => &path[..i + 1],
            None => path,
        };
    }
    match path.find('/') {
        Some(i) => &path[..i],
        None => path,
    }
}

/// Whether a module name is a runtime built-in. Anything under the `node:`
/// scheme counts.
pub fn is_builtin(name: &str) -> bool {
    name.starts_with("node:") || BUILTINS.binary_search(&name).is_ok()
}

/// Classify a module path.
///
/// Built-ins are checked first, then internal prefixes, then filesystem
/// paths; everything else is external.
pub fn classify<S: AsRef<str>>(path: &str, internal_prefixes: &[S]) -> ModuleClass {
    let name = module_name(path);
    if is_builtin(name) {
        ModuleClass::Node
    } else if internal_prefixes
        .iter()
        .any(|prefix| path.starts_with(prefix.as_ref()))
    {
        ModuleClass::Internal
    } else if name.starts_with('/') {
        ModuleClass::Absolute
    } else if name.starts_with('.') {
        ModuleClass::Relative
    } else {
        ModuleClass::External
    }
}
