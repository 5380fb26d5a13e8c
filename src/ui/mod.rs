use eframe::egui::Color32;
use palette::Srgb;

pub mod panels;
pub mod plot;

pub fn to_color32(color: Srgb<u8>) -> Color32 {
    Color32::from_rgb(color.red, color.green, color.blue)
}
