use pixfind::{PixFindError, PixelImage, RawPixels};

const OPAQUE: u32 = 0xFF00_0000;

fn make_image(data: Vec<u32>, width: usize, height: usize) -> PixelImage {
    PixelImage::from_source(&RawPixels::new(data, width, height).unwrap())
}

fn gradient(width: usize, height: usize) -> Vec<u32> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let r = ((x * 37) & 0xFF) as u32;
            let g = ((y * 11) & 0xFF) as u32;
            let b = ((x * y) & 0xFF) as u32;
            data.push(OPAQUE | (r << 16) | (g << 8) | b);
        }
    }
    data
}

#[test]
fn raw_pixels_rejects_invalid_buffers() {
    let err = RawPixels::new(vec![0; 4], 0, 4).err().unwrap();
    assert_eq!(err, PixFindError::InvalidDimensions { width: 0, height: 4 });

    let err = RawPixels::new(vec![0; 5], 2, 2).err().unwrap();
    assert_eq!(err, PixFindError::BufferTooSmall { needed: 4, got: 5 });

    let err = RawPixels::new(vec![0; 3], 2, 2).err().unwrap();
    assert_eq!(err, PixFindError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn new_image_is_absent() {
    let img = PixelImage::new("assets/");
    assert!(img.is_empty());
    assert_eq!(img.width(), 0);
    assert_eq!(img.height(), 0);
    assert!(img.pixels().is_empty());
    assert!(img.color_index().is_empty());
    assert_eq!(img.base_path().to_str(), Some("assets/"));
}

#[test]
fn build_stores_pixels_row_major() {
    let data = gradient(7, 5);
    let img = make_image(data.clone(), 7, 5);
    assert_eq!(img.width(), 7);
    assert_eq!(img.height(), 5);
    assert_eq!(img.pixels(), data.as_slice());
    assert_eq!(img.value_at(3, 2), data[2 * 7 + 3]);
}

#[test]
fn coordinate_helpers_round_trip_every_index() {
    let width = 9;
    let img = make_image(gradient(width, 4), width, 4);
    for i in 0..img.pixels().len() {
        let x = img.x_of(i);
        let y = img.y_of(i);
        assert!(x < width);
        assert_eq!(img.x_of(y * width + x), x);
        assert_eq!(img.value_at(x, y), img.pixels()[i]);
        assert_eq!(img.get(x, y), Some(img.pixels()[i]));
    }
    assert_eq!(img.get(width, 0), None);
    assert_eq!(img.get(0, 4), None);
}

#[test]
fn color_index_covers_every_pixel_in_scan_order() {
    let img = make_image(vec![4, 8, 4, 8, 8, 1], 3, 2);
    let index = img.color_index();
    assert_eq!(index.positions(4), &[0, 2]);
    assert_eq!(index.positions(8), &[1, 3, 4]);
    assert_eq!(index.positions(1), &[5]);
    let total: usize = index.colors().map(|c| index.count(c)).sum();
    assert_eq!(total, img.pixels().len());
}

#[test]
fn background_is_most_frequent_color() {
    let a = OPAQUE | 0x00AA_0000;
    let b = OPAQUE | 0x0000_00BB;
    let img = make_image(vec![a, b, a, b, b, a, b, b], 4, 2);
    assert_eq!(img.color_index().count(a), 3);
    assert_eq!(img.color_index().count(b), 5);
    assert_eq!(img.background_color(), b);
}

#[test]
fn grayscale_uses_fixed_weights_and_is_opaque() {
    let mut img = make_image(vec![0x0012_3456, OPAQUE | 0x00FF_0000], 2, 1);
    img.to_gray();
    // 0.21 * 0x12 + 0.72 * 0x34 + 0.07 * 0x56 = 3.78 + 37.44 + 6.02 = 47.24
    assert_eq!(img.pixels()[0], OPAQUE | 0x002F_2F2F);
    // 0.21 * 255 = 53.55
    assert_eq!(img.pixels()[1], OPAQUE | 0x0035_3535);
}

#[test]
fn grayscale_rebuilds_index_but_keeps_background() {
    let red = OPAQUE | 0x00FF_0000;
    let green = OPAQUE | 0x0000_FF00;
    let mut img = make_image(vec![red, green, green], 3, 1);
    assert_eq!(img.background_color(), green);

    let gray_red = OPAQUE | 0x0035_3535;
    let gray_green = OPAQUE | 0x00B7_B7B7;
    img.to_gray();
    assert!(img.color_index().positions(red).is_empty());
    assert_eq!(img.color_index().positions(gray_red), &[0]);
    assert_eq!(img.color_index().positions(gray_green), &[1, 2]);
    assert_eq!(img.background_color(), green);
    assert!(img.to_string().contains("\"bgc\": -16711936,"));
}

#[test]
fn grayscale_twice_equals_once() {
    let data = gradient(16, 12);
    let once = make_image(data.clone(), 16, 12).into_gray();
    let mut twice = make_image(data, 16, 12);
    twice.to_gray().to_gray();
    assert_eq!(once.pixels(), twice.pixels());
    assert_eq!(once.color_index(), twice.color_index());
}

#[test]
fn canonical_text_lists_rows_as_signed_integers() {
    let img = make_image(vec![1, 2, 2, OPAQUE], 2, 2);
    assert_eq!(
        img.to_string(),
        "{\"width\": 2, \"height\": 2, \"bgc\": 2, \"image\": [[1,2],[2,-16777216]]}"
    );

    let parsed: serde_json::Value = serde_json::from_str(&img.to_string()).unwrap();
    assert_eq!(parsed["image"][1][1], serde_json::json!(-16777216));
}

#[test]
fn canonical_text_of_absent_image() {
    let img = PixelImage::new("");
    assert_eq!(
        img.to_string(),
        "{\"width\": 0, \"height\": 0, \"bgc\": 0, \"image\": []}"
    );
}

#[test]
fn identity_is_md5_of_canonical_text() {
    let img = PixelImage::new("");
    // md5 of {"width": 0, "height": 0, "bgc": 0, "image": []}
    let id = img.identity().to_owned();
    assert_eq!(id.len(), 32);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

    let same = make_image(gradient(5, 5), 5, 5);
    let other = make_image(gradient(5, 5), 5, 5);
    assert_eq!(same.identity(), other.identity());
    assert_ne!(same.identity(), id);
}

#[test]
fn identity_is_cached_across_grayscale() {
    let mut img = make_image(gradient(6, 3), 6, 3);
    let before = img.identity().to_owned();
    img.to_gray();
    assert_eq!(img.identity(), before);

    let fresh = make_image(gradient(6, 3), 6, 3).into_gray();
    assert_ne!(fresh.identity(), before);
}

#[test]
fn rebuild_resets_identity() {
    let mut img = make_image(vec![1, 2, 3, 4], 2, 2);
    let before = img.identity().to_owned();
    img.build_from_raw(&RawPixels::new(vec![4, 3, 2, 1], 2, 2).unwrap());
    assert_ne!(img.identity(), before);
}
