#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod client_config;
mod client_main;
mod network;
mod tui;

use anyhow::anyhow;
use chessfront::display::{BoardOrientation, DisplayPlayer, RenderedBoard, get_display_player};
use chessfront::event::Difficulty;
use chessfront::fen::position_from_fen;
use chessfront::force::Force;
use clap::{Command, arg};
use client_config::{ClientConfig, ConfigOverrides, read_config_file};
use enum_map::{EnumMap, enum_map};
use strum::IntoEnumIterator;


fn main() -> anyhow::Result<()> {
    // Logs go to stderr: stdout is the game screen.
    env_logger::Builder::new()
        .target(env_logger::Target::Stderr)
        .filter_level(log::LevelFilter::Info)
        .filter_module("reqwest", log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let difficulties: Vec<&'static str> = Difficulty::iter().map(Difficulty::name).collect();
    let matches = Command::new("Chessfront")
        .version(clap::crate_version!())
        .about("Terminal chess client for a rules server speaking JSON over HTTP")
        .subcommand_required(true)
        .subcommand(
            Command::new("play")
                .about("Play against the computer")
                .arg(arg!(--"server" <url> "Server base URL, e.g. http://127.0.0.1:5000/"))
                .arg(arg!(--"difficulty" <level> "Computer strength").value_parser(difficulties))
                .arg(arg!(--"color" <color> "Your color").value_parser(["white", "black"]))
                .arg(arg!(
                    --"config" <file> "Path to the configuration file: yaml-serialized ClientConfig."
                )),
        )
        .subcommand(
            Command::new("show-fen")
                .about("Draws a position and exits")
                .arg(arg!(<fen> "Position in FEN"))
                .arg(arg!(--"rotate" "Black at the bottom"))
                .arg(arg!(--"ascii" "Letters instead of chess pictograms")),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("play", sub_matches)) => {
            let mut config = match sub_matches.get_one::<String>("config") {
                Some(filename) => read_config_file(filename)?,
                None => ClientConfig::default(),
            };
            let overrides = ConfigOverrides {
                server_url: sub_matches.get_one::<String>("server").cloned(),
                difficulty: sub_matches
                    .get_one::<String>("difficulty")
                    .map(|s| s.parse::<Difficulty>())
                    .transpose()?,
                player_color: sub_matches
                    .get_one::<String>("color")
                    .and_then(|s| Force::from_name(s)),
            };
            config.apply_overrides(overrides);
            client_main::run(config)
        }
        Some(("show-fen", sub_matches)) => {
            let fen = sub_matches
                .get_one::<String>("fen")
                .ok_or_else(|| anyhow!("Missing FEN"))?;
            let position = position_from_fen(fen).map_err(|err| anyhow!(err))?;
            let orientation = if sub_matches.get_flag("rotate") {
                BoardOrientation::Rotated
            } else {
                BoardOrientation::Normal
            };
            let mut labels: EnumMap<DisplayPlayer, String> = enum_map! { _ => String::new() };
            for force in Force::iter() {
                labels[get_display_player(force, orientation)] = force.name().to_owned();
            }
            let side = get_display_player(position.active_force, orientation);
            labels[side] = format!("{} (to move)", position.active_force.name());
            let board = RenderedBoard::from_position(&position, false);
            let unicode_pieces = !sub_matches.get_flag("ascii");
            println!("{}", tui::render_board(&board, orientation, &labels, unicode_pieces));
            Ok(())
        }
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}
