use glyphrun::{
    FontSystem, GlyphLayout, PackedColor,
    font::BakeConfig,
    fontdb::{self, Family, Query},
    renderer::{CpuRenderer, RgbaBitmap},
    text::{ColorTable, HorizontalAlign, TextLayoutConfig},
};
use image::{ImageBuffer, Rgba};

const TEXT: &str = "{GOLD}glyphrun{} markup preview\n\
    Runs switch color with {#4AF}hex tags{}, {FOREST}named colors{} and \
    {SKY}nested {#F0F8}translucent{} scopes{}.\n\
    \tTabs snap to stops.\tLong lines wrap at spaces, and words wider than \
    the line like {RED}supercalifragilisticexpialidocious{} are broken.\n\
    Unknown tags such as {nope} stay visible, {{braces}} are escaped.";

fn pick_system_font(font_system: &FontSystem) -> fontdb::ID {
    font_system.load_system_fonts();
    assert!(
        !font_system.is_empty(),
        "system fonts are required for the markup preview"
    );

    const FAMILIES: &[Family<'_>] = &[Family::SansSerif];
    let query = Query {
        families: FAMILIES,
        weight: fontdb::Weight::NORMAL,
        stretch: fontdb::Stretch::Normal,
        style: fontdb::Style::Normal,
    };

    if let Some((font_id, _)) = font_system.query(&query) {
        return font_id;
    }

    font_system
        .font_storage
        .lock()
        .faces()
        .next()
        .map(|face| face.id)
        .expect("no usable fonts registered in FontSystem")
}

#[allow(clippy::unwrap_used)]
fn main() {
    let font_system = FontSystem::new();
    let font_id = pick_system_font(&font_system);

    let timer = std::time::Instant::now();
    let baked = font_system
        .bake_font(
            font_id,
            &BakeConfig {
                font_size: 24.0,
                ..Default::default()
            },
        )
        .expect("failed to bake the selected font");
    println!(
        "Baked {} glyphs onto {} pages (elapsed: {:.2?})",
        baked.font.glyph_count(),
        baked.pages.len(),
        timer.elapsed()
    );

    let mut layout = GlyphLayout::with_markup(ColorTable::default().with_css_fallback(true));
    let renderer = CpuRenderer::new(&baked.pages);
    let margin = 16.0;
    let width = 480.0;

    std::fs::create_dir_all("debug").expect("failed to create debug directory");

    for (align, name) in [
        (HorizontalAlign::Left, "left"),
        (HorizontalAlign::Center, "center"),
        (HorizontalAlign::Right, "right"),
    ] {
        let config = TextLayoutConfig {
            base_color: PackedColor::WHITE,
            target_width: Some(width),
            horizontal_align: align,
            ..Default::default()
        };
        layout.set_text(&baked.font, TEXT, &config);
        println!(
            "{name}: {} runs, {} lines, {}x{}",
            layout.runs().len(),
            layout.line_count(),
            layout.width(),
            layout.height()
        );

        let image_width = (width + 2.0 * margin).ceil() as usize;
        let image_height = (layout.height() + 2.0 * margin).ceil() as usize;
        let mut bitmap = RgbaBitmap::filled(image_width, image_height, PackedColor(0x2020_28FF));
        renderer.draw_layout(&mut bitmap, &layout, [margin, margin]);

        let img_buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_raw(bitmap.width as u32, bitmap.height as u32, bitmap.pixels)
                .expect("bitmap dimensions must match pixel buffer length");

        let path = format!("debug/markup_preview_{name}.png");
        img_buffer.save(&path).expect("failed to save preview image");
        println!("Saved preview image to {path}");
    }
}
