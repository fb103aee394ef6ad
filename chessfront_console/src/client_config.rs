use anyhow::{Context, bail};
use chessfront::event::Difficulty;
use chessfront::force::Force;
use serde::{Deserialize, Serialize};
use url::Url;


// Every field may be omitted from the YAML file.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub server_url: String,
    pub difficulty: Difficulty,
    pub player_color: Force,
    // Chess pictograms instead of ASCII letters. Some terminal fonts render them badly.
    pub unicode_pieces: bool,
    // Height of the move list: older turns scroll away.
    pub history_rows: usize,
    // Draw the board from black's side when playing black.
    pub rotate_for_black: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server_url: "http://127.0.0.1:5000/".to_owned(),
            difficulty: Difficulty::default(),
            player_color: Force::White,
            unicode_pieces: true,
            history_rows: 10,
            rotate_for_black: false,
        }
    }
}

// Command line values. `None` keeps what the file (or the default) says.
#[derive(Clone, Default, Debug)]
pub struct ConfigOverrides {
    pub server_url: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub player_color: Option<Force>,
}

impl ClientConfig {
    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(contents).context("Parsing config file")
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(server_url) = overrides.server_url {
            self.server_url = server_url;
        }
        if let Some(difficulty) = overrides.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(player_color) = overrides.player_color {
            self.player_color = player_color;
        }
    }

    // Endpoints are resolved relative to this URL, so it always ends with a slash.
    pub fn base_url(&self) -> anyhow::Result<Url> {
        let mut url = Url::parse(&self.server_url)
            .with_context(|| format!("Invalid server URL '{}'", self.server_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("Unsupported server URL scheme '{}'", url.scheme());
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

pub fn read_config_file(filename: &str) -> anyhow::Result<ClientConfig> {
    let contents = std::fs::read_to_string(filename)
        .with_context(|| format!("Reading config file '{}'", filename))?;
    ClientConfig::from_yaml(&contents)
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn partial_file() {
        let config = ClientConfig::from_yaml("difficulty: hard\nplayer_color: black\n").unwrap();
        assert_eq!(config, ClientConfig {
            difficulty: Difficulty::Hard,
            player_color: Force::Black,
            ..ClientConfig::default()
        });
        assert!(ClientConfig::from_yaml("difficulty: extreme\n").is_err());
        assert!(ClientConfig::from_yaml("colour: white\n").is_err());
    }

    #[test]
    fn overrides_win() {
        let mut config = ClientConfig::from_yaml("server_url: http://chess.local/\n").unwrap();
        config.apply_overrides(ConfigOverrides {
            player_color: Some(Force::Black),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.server_url, "http://chess.local/");
        assert_eq!(config.player_color, Force::Black);
        assert_eq!(config.difficulty, Difficulty::Medium);
    }

    #[test]
    fn base_url() {
        let url = |s: &str| ClientConfig { server_url: s.to_owned(), ..ClientConfig::default() };
        assert_eq!(
            url("http://localhost:5000").base_url().unwrap().join("new_game").unwrap().as_str(),
            "http://localhost:5000/new_game"
        );
        assert_eq!(
            url("https://example.org/chess").base_url().unwrap().join("make_move").unwrap().as_str(),
            "https://example.org/chess/make_move"
        );
        assert!(url("ftp://example.org/").base_url().is_err());
        assert!(url("not a url").base_url().is_err());
    }
}
