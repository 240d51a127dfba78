/// Converts a packed `0xRRGGBB` color to opaque RGBA floats
pub fn rgb_hex(hex: u32) -> [f32; 4] {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;

    [r, g, b, 1.0]
}
