/// Contour example: trace shape outlines with directional glyphs
///
/// Renders a rectangle and a diagonal bar, then converts with the
/// DoG contour mode and with the Sobel edge binarizer for comparison.
use ascii_loom::{ConversionConfig, EdgeMethod, convert};
use image::{Rgba, RgbaImage};

fn main() {
    env_logger::init();

    println!("ASCII Loom - Contour Example");
    println!("============================\n");

    let width = 60;
    let height = 30;
    let mut img = RgbaImage::from_pixel(width, height, Rgba([235, 235, 235, 255]));

    // Filled rectangle
    for y in 6..24 {
        for x in 8..26 {
            img.put_pixel(x, y, Rgba([40, 40, 40, 255]));
        }
    }

    // Diagonal bar
    for i in 0..20 {
        for t in 0..3 {
            img.put_pixel(34 + i, 5 + i + t, Rgba([40, 40, 40, 255]));
        }
    }

    let config = ConversionConfig {
        edge_method: EdgeMethod::DogContour,
        dog_threshold: 15.0,
        ..Default::default()
    };
    println!("DoG contours (directional strokes):");
    print!("{}", convert(&img, &config).expect("conversion failed"));

    let config = ConversionConfig {
        edge_method: EdgeMethod::Sobel,
        edge_threshold: 40.0,
        ..Default::default()
    };
    println!("\nSobel edges (binary ink/blank):");
    print!("{}", convert(&img, &config).expect("conversion failed"));
}
