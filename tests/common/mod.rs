#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Minimal structurally-complete PNG: signature, IHDR with the requested
/// dimensions, empty IDAT, IEND. Dimension sniffers read the IHDR; CRCs
/// are not checked.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(57);
    bytes.extend_from_slice(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);

    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    // bit depth 8, grayscale, deflate, no filter, no interlace
    bytes.extend_from_slice(&[8, 0, 0, 0, 0]);
    bytes.extend_from_slice(&[0; 4]);

    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(b"IDAT");
    bytes.extend_from_slice(&[0; 4]);

    bytes.extend_from_slice(&0u32.to_be_bytes());
    bytes.extend_from_slice(b"IEND");
    bytes.extend_from_slice(&[0; 4]);

    bytes
}

pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, png_bytes(width, height)).expect("write png file");
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, content).expect("write file");
}

pub const LABELMAP_JSON: &str = r#"[
  {"object_id": 0, "label_id": 0, "keyboard_shortcut": "0", "object_name": "background"},
  {"object_id": 1, "label_id": 1, "keyboard_shortcut": "1", "object_name": "apple_leaf"},
  {"object_id": 2, "label_id": 2, "keyboard_shortcut": "2", "object_name": "bell_pepper_leaf"}
]"#;

/// Lays out a small but complete dataset under `root`:
///
/// - `leaf_001` (640x480) with two annotation rows
/// - `leaf_002` (320x240) with no CSV file
/// - `train.txt` listing both plus a base-name with no image on disk
/// - `val.txt` listing only `leaf_002`
pub fn setup_dataset(root: &Path) -> PathBuf {
    let category_root = root.join("plant_diseases");

    write_file(&category_root.join("labelmap.json"), LABELMAP_JSON);

    write_png(&category_root.join("images/leaf_001.png"), 640, 480);
    write_png(&category_root.join("images/leaf_002.png"), 320, 240);

    write_file(
        &category_root.join("csv/leaf_001.csv"),
        "#item,x,y,width,height,label\n\
         0,107.37,48.42,22.0,22.0,1\n\
         1,10.0,20.0,30.0,40.0,2\n",
    );

    write_file(
        &category_root.join("sets/train.txt"),
        "leaf_001\nleaf_002\nleaf_ghost\n",
    );
    write_file(&category_root.join("sets/val.txt"), "leaf_002\n");

    category_root
}
