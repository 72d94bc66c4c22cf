/// Basic example: Convert a simple test image to ASCII art
///
/// This creates a test image with a radial gradient and a bright circle
/// and prints the converted character grid for a few configurations.
use ascii_loom::{Charset, ConversionConfig, DitherAlgorithm, convert};
use image::{Rgba, RgbaImage};

fn main() {
    env_logger::init();

    println!("ASCII Loom - Basic Example");
    println!("==========================\n");

    // Create a 64x32 test image: dark background, bright circle
    let width = 64;
    let height = 32;
    let mut img = RgbaImage::new(width, height);

    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    for y in 0..height {
        for x in 0..width {
            let dx = (x as f32 - center_x) / center_x;
            // Account for the 2:1 cell aspect of terminal glyphs
            let dy = (y as f32 - center_y) / center_y;
            let dist = (dx * dx + dy * dy).sqrt();

            let value = if dist < 0.8 {
                255 - (dist * 200.0) as u8
            } else {
                30
            };
            img.put_pixel(x, y, Rgba([value, value, value, 255]));
        }
    }

    println!("Created test image: {}x{}\n", width, height);

    // Plain luminance mapping
    let config = ConversionConfig::default();
    println!("Standard ramp:");
    print!("{}", convert(&img, &config).expect("conversion failed"));

    // Floyd-Steinberg dithering on a short ramp
    let config = ConversionConfig {
        charset: Charset::Minimal,
        dithering: true,
        dither_algorithm: DitherAlgorithm::Floyd,
        ..Default::default()
    };
    println!("\nMinimal ramp with Floyd-Steinberg dithering:");
    print!("{}", convert(&img, &config).expect("conversion failed"));

    println!("\nDone.");
}
