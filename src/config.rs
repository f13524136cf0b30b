use clap::Parser;
use std::time::Duration;

// CLI argument structure, every flag falls back to an environment variable
#[derive(Parser, Debug, Clone)]
#[command(name = "deepseek-gateway")]
#[command(about = "Rate-limited chat gateway for the DeepSeek completion API")]
pub struct Args {
    // Upstream API key, chat is disabled without it
    #[arg(long, env = "DEEPSEEK_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    // Upstream base URL (OpenAI compatible)
    #[arg(long, env = "DEEPSEEK_BASE_URL", default_value = "https://api.deepseek.com/v1")]
    pub base_url: String,

    #[arg(long, env = "DEEPSEEK_MODEL", default_value = "deepseek-chat")]
    pub model: String,

    #[arg(long, env = "DEEPSEEK_TEMPERATURE", default_value_t = 0.7)]
    pub temperature: f64,

    // Upstream request timeout in seconds
    #[arg(long, env = "DEEPSEEK_TIMEOUT", default_value_t = 30)]
    pub upstream_timeout: u64,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    // Deployment environment label reported by /api/health
    #[arg(long, env = "VERCEL_ENV", default_value = "development")]
    pub environment: String,

    // Debug logging
    #[arg(long, env = "DEBUG", default_value_t = false)]
    pub debug: bool,

    // Rate limit max requests per window, 0 disables
    #[arg(long, env = "RATE_LIMIT", default_value_t = 10)]
    pub rate_limit: usize,

    // Rate limit window in seconds
    #[arg(long, env = "RATE_WINDOW", default_value_t = 60)]
    pub rate_window: u64,

    // How often idle clients are evicted from the limiter
    #[arg(long, env = "RATE_CLEANUP_INTERVAL", default_value_t = 300)]
    pub rate_cleanup_interval: u64,

    // Key clients by the first X-Forwarded-For hop (behind a proxy)
    #[arg(long, env = "TRUST_FORWARDED_FOR", default_value_t = false)]
    pub trust_forwarded_for: bool,
}

impl Args {
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }

    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window)
    }

    pub fn rate_cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.rate_cleanup_interval.max(1))
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
