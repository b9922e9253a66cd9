//! Request payload builders
//!
//! Each function renders the XML fragment placed inside the `YAMAHA_AV`
//! envelope. Zone-scoped fragments are additionally wrapped with [`zone`]
//! by the receiver; source-scoped ones already name their source.

/// Placeholder value that turns a fragment into a read request
pub const GET_PARAM: &str = "GetParam";

pub fn zone(zone: &str, request: &str) -> String {
    format!("<{zone}>{request}</{zone}>")
}

pub fn basic_status() -> String {
    format!("<Basic_Status>{GET_PARAM}</Basic_Status>")
}

pub fn power(state: &str) -> String {
    format!("<Power_Control><Power>{state}</Power></Power_Control>")
}

pub fn sleep(value: &str) -> String {
    format!("<Power_Control><Sleep>{value}</Sleep></Power_Control>")
}

pub fn input_sel(input: &str) -> String {
    format!("<Input><Input_Sel>{input}</Input_Sel></Input>")
}

pub fn input_sel_item(input: &str) -> String {
    format!("<Input><Input_Sel_Item>{input}</Input_Sel_Item></Input>")
}

pub fn config(source: &str) -> String {
    format!("<{source}><Config>{GET_PARAM}</Config></{source}>")
}

pub fn play_info(source: &str) -> String {
    format!("<{source}><Play_Info>{GET_PARAM}</Play_Info></{source}>")
}

pub fn play_control(source: &str, action: PlaybackAction) -> String {
    format!(
        "<{source}><Play_Control><Playback>{}</Playback></Play_Control></{source}>",
        action.as_str()
    )
}

pub fn volume_level(value: &str) -> String {
    format!("<Volume><Lvl>{value}</Lvl></Volume>")
}

pub fn volume_value(val: i32, exp: u8, unit: &str) -> String {
    format!("<Val>{val}</Val><Exp>{exp}</Exp><Unit>{unit}</Unit>")
}

pub fn volume_mute(state: &str) -> String {
    format!("<Volume><Mute>{state}</Mute></Volume>")
}

pub fn hdmi_out(port: &str, command: &str) -> String {
    format!(
        "<System><Sound_Video><HDMI><Output><OUT_{port}>{command}</OUT_{port}></Output></HDMI></Sound_Video></System>"
    )
}

pub fn available_scenes() -> String {
    format!("<Config>{GET_PARAM}</Config>")
}

pub fn scene(parameter: &str) -> String {
    format!("<Scene><Scene_Sel>{parameter}</Scene_Sel></Scene>")
}

pub fn surround_program(parameter: &str) -> String {
    format!("<Surround><Program_Sel><Current>{parameter}</Current></Program_Sel></Surround>")
}

pub fn sound_program(name: &str) -> String {
    format!("<Sound_Program>{name}</Sound_Program>")
}

/// Transport actions accepted by `Play_Control`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackAction {
    Play,
    Pause,
    Stop,
    SkipForward,
    SkipReverse,
}

impl PlaybackAction {
    /// Wire value, also the method name listed in the descriptor
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackAction::Play => "Play",
            PlaybackAction::Pause => "Pause",
            PlaybackAction::Stop => "Stop",
            PlaybackAction::SkipForward => "Skip Fwd",
            PlaybackAction::SkipReverse => "Skip Rev",
        }
    }
}
