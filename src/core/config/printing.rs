use crate::core::config::data::Config;
use crate::core::config::defaults::DEFAULT_BASE_URL;

fn or_unset<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "(unset)".to_string())
}

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.base_url {
            Some(url) => println!("  base-url: {url}"),
            None => println!("  base-url: (unset, default {DEFAULT_BASE_URL})"),
        }
        println!(
            "  default-persona: {}",
            or_unset(self.default_persona.as_deref())
        );
        println!("  merchant: {}", or_unset(self.merchant_id.as_deref()));
        println!("  multiplier: {}", or_unset(self.multiplier));
        match self.timeout_secs {
            Some(secs) if secs > 0 => println!("  timeout: {secs}s"),
            _ => println!("  timeout: none"),
        }
        println!(
            "  fallback-latency: {}ms",
            self.fallback_latency().as_millis()
        );
    }
}
