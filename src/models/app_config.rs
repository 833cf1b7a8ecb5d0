use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Process-wide app configuration stored in redb
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfigRecord {
    pub app_name: String,
    pub login_subtitle: String,
    pub primary_color: String,
    /// Palette the write-diary button color is drawn from
    pub write_diary_button_colors: Vec<String>,
    /// Instance owner, recorded at initialization. Never sent to clients.
    pub user: Option<ConfigOwner>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigOwner {
    pub username: String,
}

/// The subset of the app config safe to hand to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrontendConfig {
    pub button_color: String,
    pub primary_color: String,
    pub app_name: String,
    pub login_subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub need_init: Option<bool>,
}

/// Editable fields accepted by `PUT /api/appConfig`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfigForm {
    pub app_name: String,
    pub login_subtitle: String,
    pub primary_color: String,
    pub write_diary_button_colors: Vec<String>,
}

impl AppConfigRecord {
    /// Seed record built from server defaults for a freshly created owner
    pub fn seeded(config: &Config, owner: &str) -> Self {
        Self {
            app_name: config.default_app_name.clone(),
            login_subtitle: config.default_login_subtitle.clone(),
            primary_color: config.default_primary_color.clone(),
            write_diary_button_colors: config.default_button_colors.clone(),
            user: Some(ConfigOwner {
                username: owner.to_string(),
            }),
        }
    }

    /// Apply a form, keeping the owner
    pub fn apply(&mut self, form: AppConfigForm) {
        self.app_name = form.app_name;
        self.login_subtitle = form.login_subtitle;
        self.primary_color = form.primary_color;
        self.write_diary_button_colors = form.write_diary_button_colors;
    }
}

impl AppConfigForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.app_name.trim().is_empty() {
            return Err("appName must not be empty".to_string());
        }
        if self.write_diary_button_colors.is_empty()
            || self
                .write_diary_button_colors
                .iter()
                .any(|c| c.trim().is_empty())
        {
            return Err("writeDiaryButtonColors must hold at least one color".to_string());
        }
        Ok(())
    }
}

/// Strip the palette and owner, picking one palette entry uniformly at random
///
/// An empty palette falls back to the primary color.
pub fn build_frontend_config<R: Rng + ?Sized>(
    config: &AppConfigRecord,
    need_init: bool,
    rng: &mut R,
) -> FrontendConfig {
    let palette = &config.write_diary_button_colors;
    let button_color = if palette.is_empty() {
        tracing::warn!("Button color palette is empty, using primary color");
        config.primary_color.clone()
    } else {
        palette[rng.gen_range(0..palette.len())].clone()
    };

    FrontendConfig {
        button_color,
        primary_color: config.primary_color.clone(),
        app_name: config.app_name.clone(),
        login_subtitle: config.login_subtitle.clone(),
        need_init: need_init.then_some(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn record(palette: &[&str]) -> AppConfigRecord {
        AppConfigRecord {
            app_name: "Diary".to_string(),
            login_subtitle: "hello".to_string(),
            primary_color: "#000000".to_string(),
            write_diary_button_colors: palette.iter().map(|c| c.to_string()).collect(),
            user: Some(ConfigOwner {
                username: "alice".to_string(),
            }),
        }
    }

    #[test]
    fn test_button_color_is_from_palette() {
        let config = record(&["#111", "#222", "#333"]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let out = build_frontend_config(&config, false, &mut rng);
            assert!(config.write_diary_button_colors.contains(&out.button_color));
        }
    }

    #[test]
    fn test_every_palette_entry_is_reachable() {
        let config = record(&["#111", "#222", "#333", "#444"]);
        let mut rng = StdRng::seed_from_u64(42);
        let seen: HashSet<String> = (0..500)
            .map(|_| build_frontend_config(&config, false, &mut rng).button_color)
            .collect();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_same_seed_same_color() {
        let config = record(&["#111", "#222", "#333"]);
        let a = build_frontend_config(&config, false, &mut StdRng::seed_from_u64(3));
        let b = build_frontend_config(&config, false, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_output_has_no_palette_or_user() {
        let config = record(&["#111"]);
        let out = build_frontend_config(&config, false, &mut StdRng::seed_from_u64(1));
        let json = serde_json::to_value(&out).unwrap();

        assert_eq!(json["buttonColor"], "#111");
        assert_eq!(json["appName"], "Diary");
        assert!(json.get("user").is_none());
        assert!(json.get("writeDiaryButtonColors").is_none());
        assert!(json.get("needInit").is_none());
    }

    #[test]
    fn test_need_init_flag() {
        let config = record(&["#111"]);
        let out = build_frontend_config(&config, true, &mut StdRng::seed_from_u64(1));
        assert_eq!(out.need_init, Some(true));
    }

    #[test]
    fn test_empty_palette_uses_primary() {
        let config = record(&[]);
        let out = build_frontend_config(&config, false, &mut StdRng::seed_from_u64(1));
        assert_eq!(out.button_color, "#000000");
    }

    #[test]
    fn test_form_validation() {
        let mut form = AppConfigForm {
            app_name: "Diary".to_string(),
            login_subtitle: String::new(),
            primary_color: "#000".to_string(),
            write_diary_button_colors: vec!["#fff".to_string()],
        };
        assert!(form.validate().is_ok());

        form.write_diary_button_colors.clear();
        assert!(form.validate().is_err());

        form.write_diary_button_colors = vec![" ".to_string()];
        assert!(form.validate().is_err());
    }
}
