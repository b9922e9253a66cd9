//! Receiver handle
//!
//! [`Receiver`] owns a transport, the configuration and the parsed unit
//! descriptor. Property getters are single `GET` round trips, setters single
//! `PUT`s. Menu navigation is exposed through [`Receiver::menu`] and a few
//! convenience wrappers.

use crate::commands::{self, PlaybackAction, GET_PARAM};
use crate::descriptor::Descriptor;
use crate::menu::{Cursor, MenuDevice, MenuNavigator, MenuRequest, MenuSnapshot, PathSpec, ServerPath};
use crate::transport::{HttpTransport, Transport};
use crate::xml::{child_elements, descendants, element_text, find_descendant, text_at, unescape_text};
use crate::{ApiError, ReceiverConfig, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;
use ync_client::Command;
use xmltree::Element;

const ARTIST_TAGS: &[&str] = &["Artist", "Program_Type"];
const ALBUM_TAGS: &[&str] = &["Album", "Radio_Text_A"];
const SONG_TAGS: &[&str] = &["Song", "Track", "Radio_Text_B"];
const STATION_TAGS: &[&str] = &["Station", "Program_Service"];

const HDMI_OUTPUT_PREFIX: &str = "System,Sound_Video,HDMI,Output";

/// Summary returned by `Basic_Status`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicStatus {
    pub on: bool,
    /// Volume in dB
    pub volume: f64,
    pub mute: bool,
    pub input: String,
}

/// Transport actions an input declares in the descriptor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlaybackSupport {
    pub play: bool,
    pub pause: bool,
    pub stop: bool,
    pub skip_f: bool,
    pub skip_r: bool,
}

/// What the active source is playing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayStatus {
    pub playing: bool,
    pub artist: String,
    pub album: String,
    pub song: String,
    pub station: String,
}

/// Handle to one zone of a receiver
#[derive(Debug, Clone)]
pub struct Receiver<T: Transport = HttpTransport> {
    transport: T,
    config: ReceiverConfig,
    descriptor: Descriptor,
    inputs_cache: OnceLock<BTreeMap<String, String>>,
    scenes_cache: OnceLock<BTreeMap<String, String>>,
}

impl Receiver<HttpTransport> {
    /// Connect over HTTP and fetch the unit descriptor
    ///
    /// # Errors
    /// Fails when the descriptor cannot be fetched or parsed, which usually
    /// means the device is not a supported receiver.
    pub fn new(config: ReceiverConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config);
        Self::with_transport(transport, config)
    }
}

impl<T: Transport> Receiver<T> {
    /// Build a handle over any transport and fetch the unit descriptor
    pub fn with_transport(transport: T, config: ReceiverConfig) -> Result<Self> {
        let root = transport.descriptor().map_err(|e| {
            error!(desc_url = %config.desc_url, "Failed to fetch unit descriptor: {}", e);
            e
        })?;

        Ok(Self {
            transport,
            config,
            descriptor: Descriptor::new(root),
            inputs_cache: OnceLock::new(),
            scenes_cache: OnceLock::new(),
        })
    }

    pub fn config(&self) -> &ReceiverConfig {
        &self.config
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send a zone-scoped request
    fn zone_request(&self, command: Command, fragment: &str) -> Result<Element> {
        self.transport
            .request(command, &commands::zone(&self.config.zone, fragment))
    }

    /// Send a request that names its own source or subsystem
    fn source_request(&self, command: Command, fragment: &str) -> Result<Element> {
        self.transport.request(command, fragment)
    }

    /// Text below the zone element of a reply
    fn zone_text(&self, response: &Element, path: &str) -> Result<String> {
        text_at(response, &format!("{}/{}", self.config.zone, path))
    }

    pub fn basic_status(&self) -> Result<BasicStatus> {
        let response = self.zone_request(Command::Get, &commands::basic_status())?;
        let on = self.zone_text(&response, "Basic_Status/Power_Control/Power")?;
        let input = self.zone_text(&response, "Basic_Status/Input/Input_Sel")?;
        let mute = self.zone_text(&response, "Basic_Status/Volume/Mute")?;
        let volume = self.zone_text(&response, "Basic_Status/Volume/Lvl/Val")?;

        Ok(BasicStatus {
            on: on == "On",
            volume: parse_tenths(&volume)?,
            mute: mute == "On",
            input,
        })
    }

    pub fn is_on(&self) -> Result<bool> {
        let response = self.zone_request(Command::Get, &commands::power(GET_PARAM))?;
        let power = self.zone_text(&response, "Power_Control/Power")?;
        parse_switch(&power, "On", "Standby")
    }

    pub fn set_on(&self, on: bool) -> Result<()> {
        let state = if on { "On" } else { "Standby" };
        info!(zone = %self.config.zone, state, "setting power");
        self.zone_request(Command::Put, &commands::power(state))?;
        Ok(())
    }

    /// Currently selected input
    pub fn input(&self) -> Result<String> {
        let response = self.zone_request(Command::Get, &commands::input_sel(GET_PARAM))?;
        self.zone_text(&response, "Input/Input_Sel")
    }

    /// Select an input by name
    ///
    /// # Errors
    /// `InvalidParameter` when the receiver does not list `name`.
    pub fn set_input(&self, name: &str) -> Result<()> {
        if !self.inputs()?.contains_key(name) {
            return Err(ApiError::InvalidParameter(format!("unknown input '{}'", name)));
        }
        info!(zone = %self.config.zone, input = name, "selecting input");
        self.zone_request(Command::Put, &commands::input_sel(name))?;
        Ok(())
    }

    /// Input names mapped to their content-source names
    ///
    /// Inputs without a browsable source map to an empty string. The first
    /// non-empty answer is cached for the lifetime of the handle.
    pub fn inputs(&self) -> Result<BTreeMap<String, String>> {
        if let Some(inputs) = self.inputs_cache.get() {
            return Ok(inputs.clone());
        }

        let response = self.zone_request(Command::Get, &commands::input_sel_item(GET_PARAM))?;
        let all = descendants(&response);
        let params = all.iter().filter(|e| e.name == "Param").map(|e| element_text(e));
        let sources = all.iter().filter(|e| e.name == "Src_Name").map(|e| element_text(e));
        let inputs: BTreeMap<String, String> = params.zip(sources).collect();

        if !inputs.is_empty() {
            let _ = self.inputs_cache.set(inputs.clone());
        }
        Ok(inputs)
    }

    /// Content-source name of `input`, `None` when it has no menu or playback source
    pub fn source_name(&self, input: &str) -> Result<Option<String>> {
        Ok(self
            .inputs()?
            .remove(input)
            .filter(|source| !source.is_empty()))
    }

    /// Volume in dB
    pub fn volume(&self) -> Result<f64> {
        let response = self.zone_request(Command::Get, &commands::volume_level(GET_PARAM))?;
        parse_tenths(&self.zone_text(&response, "Volume/Lvl/Val")?)
    }

    /// Set the volume in dB
    ///
    /// The receiver only accepts half-dB steps; finer values are truncated
    /// toward zero to the nearest half step.
    pub fn set_volume(&self, db: f64) -> Result<()> {
        let value = volume_wire_value(db);
        debug!(zone = %self.config.zone, db, value, "setting volume");
        let level = commands::volume_value(value, 1, "dB");
        self.zone_request(Command::Put, &commands::volume_level(&level))?;
        Ok(())
    }

    /// Step the volume 1 dB at a time from the current level to `target`
    ///
    /// Both ends are included, and each step is followed by `step_delay`.
    pub fn volume_fade(&self, target: i32, step_delay: Duration) -> Result<()> {
        let start = self.volume()?.floor() as i32;
        let step = if target > start { 1 } else { -1 };

        let mut level = start;
        loop {
            self.set_volume(f64::from(level))?;
            std::thread::sleep(step_delay);
            if level == target {
                return Ok(());
            }
            level += step;
        }
    }

    pub fn mute(&self) -> Result<bool> {
        let response = self.zone_request(Command::Get, &commands::volume_mute(GET_PARAM))?;
        let mute = self.zone_text(&response, "Volume/Mute")?;
        parse_switch(&mute, "On", "Off")
    }

    pub fn set_mute(&self, mute: bool) -> Result<()> {
        let state = if mute { "On" } else { "Off" };
        self.zone_request(Command::Put, &commands::volume_mute(state))?;
        Ok(())
    }

    /// Sleep timer setting, e.g. `Off` or `30 min`
    pub fn sleep(&self) -> Result<String> {
        let response = self.zone_request(Command::Get, &commands::sleep(GET_PARAM))?;
        self.zone_text(&response, "Power_Control/Sleep")
    }

    pub fn set_sleep(&self, value: &str) -> Result<()> {
        self.zone_request(Command::Put, &commands::sleep(value))?;
        Ok(())
    }

    pub fn surround_program(&self) -> Result<String> {
        let response = self.zone_request(Command::Get, &commands::surround_program(GET_PARAM))?;
        self.zone_text(&response, "Surround/Program_Sel/Current/Sound_Program")
    }

    /// # Errors
    /// `InvalidParameter` when the descriptor does not list `name` for this zone.
    pub fn set_surround_program(&self, name: &str) -> Result<()> {
        if !self.surround_programs().iter().any(|program| program == name) {
            return Err(ApiError::InvalidParameter(format!(
                "unknown surround program '{}'",
                name
            )));
        }
        let parameter = commands::sound_program(name);
        self.zone_request(Command::Put, &commands::surround_program(&parameter))?;
        Ok(())
    }

    /// Surround programs the current zone accepts, empty when the descriptor lists none
    pub fn surround_programs(&self) -> Vec<String> {
        self.descriptor
            .surround_programs(&self.config.zone)
            .unwrap_or_default()
    }

    pub fn scene(&self) -> Result<String> {
        let response = self.zone_request(Command::Get, &commands::scene(GET_PARAM))?;
        self.zone_text(&response, "Scene/Scene_Sel")
    }

    /// # Errors
    /// `InvalidParameter` when `name` is not one of [`scenes`](Self::scenes).
    pub fn set_scene(&self, name: &str) -> Result<()> {
        let scenes = self.scenes()?;
        let Some(scene) = scenes.get(name) else {
            return Err(ApiError::InvalidParameter(format!("unknown scene '{}'", name)));
        };
        self.zone_request(Command::Put, &commands::scene(scene))?;
        Ok(())
    }

    /// Scene display names mapped to the scene selector value, e.g. `Scene 1`
    pub fn scenes(&self) -> Result<BTreeMap<String, String>> {
        if let Some(scenes) = self.scenes_cache.get() {
            return Ok(scenes.clone());
        }

        let response = self.zone_request(Command::Get, &commands::available_scenes())?;
        let scenes: BTreeMap<String, String> = find_descendant(&response, "Scene")
            .map(|scene_list| {
                child_elements(scene_list)
                    .map(|scene| (element_text(scene), scene.name.replace('_', " ")))
                    .collect()
            })
            .unwrap_or_default();

        if !scenes.is_empty() {
            let _ = self.scenes_cache.set(scenes.clone());
        }
        Ok(scenes)
    }

    pub fn zone(&self) -> &str {
        &self.config.zone
    }

    /// Address another zone of the same receiver
    ///
    /// # Errors
    /// `InvalidParameter` when the descriptor does not declare `zone`.
    pub fn set_zone(&mut self, zone: &str) -> Result<()> {
        if !self.zones().iter().any(|z| z == zone) {
            return Err(ApiError::InvalidParameter(format!("unknown zone '{}'", zone)));
        }
        self.config.zone = zone.to_string();
        Ok(())
    }

    /// Zones declared by the descriptor
    pub fn zones(&self) -> Vec<String> {
        self.descriptor.zones()
    }

    /// One handle per zone, sharing configuration and caches at the time of the call
    pub fn zone_controllers(&self) -> Vec<Self>
    where
        T: Clone,
    {
        self.zones()
            .into_iter()
            .map(|zone| {
                let mut controller = self.clone();
                controller.config.zone = zone;
                controller
            })
            .collect()
    }

    /// HDMI outputs mapped to their state, e.g. `hdmi1 -> "on"`
    pub fn outputs(&self) -> Result<BTreeMap<String, String>> {
        let mut outputs = BTreeMap::new();

        for command in self.descriptor.find_commands(HDMI_OUTPUT_PREFIX) {
            let Some(port) = command.rsplit_once('_').map(|(_, port)| port) else {
                continue;
            };
            if port.is_empty() || !port.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }

            let response = self.source_request(Command::Get, &commands::hdmi_out(port, GET_PARAM))?;
            let state = text_at(&response, &command.replace(',', "/"))?;
            outputs.insert(format!("hdmi{}", port), state.to_lowercase());
        }

        Ok(outputs)
    }

    /// Switch an HDMI output named `hdmiN`
    ///
    /// # Errors
    /// `UnknownPort` when `port` is not of that form.
    pub fn enable_output(&self, port: &str, enabled: bool) -> Result<()> {
        let number = hdmi_port_number(port).ok_or_else(|| ApiError::UnknownPort(port.to_string()))?;
        let command = if enabled { "On" } else { "Off" };
        self.source_request(Command::Put, &commands::hdmi_out(&number, command))?;
        Ok(())
    }

    pub fn supports_method(&self, source: &str, args: &[&str]) -> bool {
        self.descriptor.supports_method(source, args)
    }

    pub fn supports_play_method(&self, source: &str, method: &str) -> bool {
        self.descriptor.supports_play_method(source, method)
    }

    /// Playback actions supported by `input`, the current input when `None`
    pub fn playback_support(&self, input: Option<&str>) -> Result<PlaybackSupport> {
        let input = match input {
            Some(input) => input.to_string(),
            None => self.input()?,
        };
        let Some(source) = self.source_name(&input)? else {
            return Ok(PlaybackSupport::default());
        };

        let supports = |action: PlaybackAction| self.supports_play_method(&source, action.as_str());
        Ok(PlaybackSupport {
            play: supports(PlaybackAction::Play),
            pause: supports(PlaybackAction::Pause),
            stop: supports(PlaybackAction::Stop),
            skip_f: supports(PlaybackAction::SkipForward),
            skip_r: supports(PlaybackAction::SkipReverse),
        })
    }

    pub fn is_playback_supported(&self, input: Option<&str>) -> Result<bool> {
        Ok(self.playback_support(input)?.play)
    }

    pub fn play(&self) -> Result<()> {
        self.playback_control(PlaybackAction::Play)
    }

    pub fn pause(&self) -> Result<()> {
        self.playback_control(PlaybackAction::Pause)
    }

    pub fn stop(&self) -> Result<()> {
        self.playback_control(PlaybackAction::Stop)
    }

    pub fn next(&self) -> Result<()> {
        self.playback_control(PlaybackAction::SkipForward)
    }

    pub fn previous(&self) -> Result<()> {
        self.playback_control(PlaybackAction::SkipReverse)
    }

    fn playback_control(&self, action: PlaybackAction) -> Result<()> {
        let input = self.input()?;
        if !self.is_playback_supported(Some(&input))? {
            return Err(ApiError::PlaybackUnavailable {
                input,
                action: action.as_str().to_string(),
            });
        }

        let Some(source) = self.source_name(&input)? else {
            return Ok(());
        };
        debug!(source = %source, action = action.as_str(), "playback control");
        self.source_request(Command::Put, &commands::play_control(&source, action))?;
        Ok(())
    }

    /// What the current source is playing
    ///
    /// `None` when the input has no source or the source has no `Play_Info`.
    pub fn play_status(&self) -> Result<Option<PlayStatus>> {
        let input = self.input()?;
        let Some(source) = self.source_name(&input)? else {
            return Ok(None);
        };
        if !self.supports_method(&source, &["Play_Info"]) {
            return Ok(None);
        }

        let response = self.source_request(Command::Get, &commands::play_info(&source))?;
        let playing = first_text(&response, &["Playback_Info"]) == "Play" || source == "Tuner";

        Ok(Some(PlayStatus {
            playing,
            artist: first_text(&response, ARTIST_TAGS),
            album: first_text(&response, ALBUM_TAGS),
            song: first_text(&response, SONG_TAGS),
            station: first_text(&response, STATION_TAGS),
        }))
    }

    /// Whether the current source reports its features as available
    ///
    /// Inputs without a source are always ready.
    pub fn is_ready(&self) -> Result<bool> {
        let input = self.input()?;
        let Some(source) = self.source_name(&input)? else {
            return Ok(true);
        };

        let response = self.source_request(Command::Get, &commands::config(&source))?;
        let availability = find_descendant(&response, "Feature_Availability")
            .map(element_text)
            .ok_or_else(|| ApiError::MissingElement("Feature_Availability".to_string()))?;
        Ok(availability == "Ready")
    }

    pub fn small_image_url(&self) -> Result<String> {
        self.image_url("sm")
    }

    pub fn large_image_url(&self) -> Result<String> {
        self.image_url("lrg")
    }

    fn image_url(&self, size: &str) -> Result<String> {
        let url = Url::parse(&self.config.ctrl_url)
            .map_err(|e| ApiError::ParseError(format!("Invalid control URL: {}", e)))?;
        let host = url
            .host_str()
            .ok_or_else(|| ApiError::ParseError(format!("Control URL has no host: {}", url)))?;
        Ok(format!("http://{}:8080/BCO_device_{}_icon.png", host, size))
    }

    /// Menu navigator for the current input
    pub fn menu(&self) -> MenuNavigator<'_, Self> {
        MenuNavigator::new(self, self.config.poll).with_content_input(self.config.content_source_input.clone())
    }

    pub fn menu_status(&self) -> Result<MenuSnapshot> {
        self.menu().status()
    }

    pub fn menu_jump_line(&self, line: u32) -> Result<()> {
        self.menu().jump_to_line(line)
    }

    pub fn menu_up(&self) -> Result<()> {
        self.menu().move_cursor(Cursor::Up)
    }

    pub fn menu_down(&self) -> Result<()> {
        self.menu().move_cursor(Cursor::Down)
    }

    pub fn menu_left(&self) -> Result<()> {
        self.menu().move_cursor(Cursor::Left)
    }

    pub fn menu_right(&self) -> Result<()> {
        self.menu().move_cursor(Cursor::Right)
    }

    pub fn menu_sel(&self) -> Result<()> {
        self.menu().move_cursor(Cursor::Select)
    }

    pub fn menu_return(&self) -> Result<()> {
        self.menu().move_cursor(Cursor::Return)
    }

    pub fn menu_home(&self) -> Result<()> {
        self.menu().move_cursor(Cursor::Home)
    }

    /// Every playable path of the current server input
    ///
    /// Walks the whole tree, which may take a long time on large libraries.
    pub fn server_paths(&self) -> Result<Vec<ServerPath>> {
        let tree = self.menu().walk(&[])?;
        Ok(crate::menu::flatten_paths(&tree))
    }

    /// Play a server entry by name path (`A>B>C`) or index path (`[1, 4, 18]`)
    ///
    /// Prefer index paths: name lookup reads every page of each layer.
    pub fn server_select(&self, path: impl Into<PathSpec>) -> Result<()> {
        self.menu().select(path)
    }

    /// Play a net radio entry by name path, e.g. `Bookmarks>Internet>Radio Paradise`
    pub fn net_radio(&self, path: &str) -> Result<()> {
        self.menu().select_net_radio(
            path,
            &self.config.net_radio_input,
            self.config.net_radio_attempts,
            self.config.net_radio_interval,
        )
    }
}

impl<T: Transport> MenuDevice for Receiver<T> {
    fn current_input(&self) -> Result<String> {
        self.input()
    }

    fn source_name_for(&self, input: &str) -> Result<Option<String>> {
        self.source_name(input)
    }

    fn set_active_input(&self, input: &str) -> Result<()> {
        self.set_input(input)
    }

    fn send_menu_request(&self, source: &str, request: &MenuRequest) -> Result<Element> {
        self.source_request(request.command(), &request.payload(source))
    }
}

impl<T: Transport> fmt::Display for Receiver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Receiver model_name=\"{}\" zone=\"{}\" ctrl_url=\"{}\">",
            self.config.model_name, self.config.zone, self.config.ctrl_url
        )
    }
}

/// Wire value for a volume in dB: half-dB steps scaled by ten
pub fn volume_wire_value(db: f64) -> i32 {
    (db * 2.0).trunc() as i32 * 5
}

/// Port number of an output named `hdmiN`, case-insensitive
fn hdmi_port_number(port: &str) -> Option<String> {
    let lower = port.to_lowercase();
    let digits: String = lower
        .strip_prefix("hdmi")?
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    (!digits.is_empty()).then_some(digits)
}

fn parse_tenths(value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<i32>()
        .map(|raw| f64::from(raw) / 10.0)
        .map_err(|_| ApiError::ParseError(format!("volume is not a number: '{}'", value)))
}

fn parse_switch(value: &str, on: &str, off: &str) -> Result<bool> {
    match value {
        v if v == on => Ok(true),
        v if v == off => Ok(false),
        other => Err(ApiError::ParseError(format!(
            "expected '{}' or '{}', got '{}'",
            on, off, other
        ))),
    }
}

/// First non-empty text among descendants named by `tags`, unescaped and trimmed
fn first_text(response: &Element, tags: &[&str]) -> String {
    tags.iter()
        .filter_map(|tag| find_descendant(response, tag))
        .map(element_text)
        .find(|text| !text.is_empty())
        .map(|text| unescape_text(&text).trim().to_string())
        .unwrap_or_default()
}
