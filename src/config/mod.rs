use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::PathBuf,
    time::Duration,
};

use directories::BaseDirs;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
    read_env: bool,
}

impl Config {
    pub fn load() -> Self {
        let mut map = default_map();
        let config_path = default_config_path();

        // Read .solvedocrc if exists
        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    if let Some((k, v)) = parse_line(&line) {
                        map.insert(k, v);
                    }
                }
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path, read_env: true }
    }

    /// Defaults overlaid with explicit values; the process environment is ignored.
    #[cfg(test)]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = default_map();
        for (k, v) in pairs {
            map.insert(k.into(), v.into());
        }
        Self { inner: map, config_path: default_config_path(), read_env: false }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        // ENV first
        if self.read_env {
            if let Ok(v) = env::var(key) {
                return Some(v);
            }
        }
        self.inner.get(key).cloned()
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.trim().parse::<usize>().ok())
    }

    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(|v| v.trim().parse::<u32>().ok())
    }

    pub fn get_f32(&self, key: &str) -> Option<f32> {
        self.get(key).and_then(|v| v.trim().parse::<f32>().ok())
    }

    /// Whole seconds, e.g. `RUN_TIMEOUT=3`.
    pub fn get_secs(&self, key: &str) -> Option<Duration> {
        self.get(key)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).map(PathBuf::from)
    }

    /// Base URL of the chat-completion API, always ending in `/v1`.
    pub fn api_base_url(&self) -> String {
        let raw = self.get("API_BASE_URL").unwrap_or_else(|| "default".into());
        normalize_base_url(&raw)
    }
}

pub fn normalize_base_url(raw: &str) -> String {
    if raw == "default" {
        return "https://api.openai.com/v1".to_string();
    }
    let trimmed = raw.trim_end_matches('/');
    if !trimmed.ends_with("/v1") && !trimmed.contains("/v1/") {
        format!("{}/v1", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Decode `\n`, `\t`, `\r` and `\\` so simulated input can be written on one line.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    line.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
}

fn is_config_key(k: &str) -> bool {
    // Accept known keys or SOLVEDOC_*/OPENAI_* for forward-compat
    const KEYS: &[&str] = &[
        "OPENAI_API_KEY",
        "API_BASE_URL",
        "DEFAULT_MODEL",
        "MAX_TOKENS",
        "TEMPERATURE",
        "REQUEST_TIMEOUT",
        "C_COMPILER",
        "COMPILER_ARGS",
        "COMPILE_TIMEOUT",
        "RUN_TIMEOUT",
        "DEFAULT_STDIN",
        "WORKERS",
        "OUTPUT_FILE",
        "OUTPUT_FORMAT",
    ];

    KEYS.contains(&k) || k.starts_with("SOLVEDOC_") || k.starts_with("OPENAI_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("solvedoc").join(".solvedocrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    // Generation
    m.insert("API_BASE_URL".into(), "default".into());
    m.insert("DEFAULT_MODEL".into(), "gpt-4o-mini".into());
    m.insert("MAX_TOKENS".into(), "1500".into());
    m.insert("TEMPERATURE".into(), "0.2".into());
    m.insert("REQUEST_TIMEOUT".into(), "60".into());

    // Compile / run
    m.insert("C_COMPILER".into(), "gcc".into());
    m.insert("COMPILER_ARGS".into(), String::new());
    m.insert("COMPILE_TIMEOUT".into(), "10".into());
    m.insert("RUN_TIMEOUT".into(), "3".into());
    m.insert("DEFAULT_STDIN".into(), "42\\n".into());

    // Pipeline / output
    m.insert("WORKERS".into(), "4".into());
    m.insert("OUTPUT_FILE".into(), "C_Programming_Solutions.html".into());
    m.insert("OUTPUT_FORMAT".into(), "html".into());

    m
}
