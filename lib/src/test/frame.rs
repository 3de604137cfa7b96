use crate::ColorFrame;
use crate::DepthFrame;
use crate::Error;
use crate::frame::check_dimensions;

#[test]
fn depth_from_le_bytes() {
    let raw = [0xbc, 0x02, 0x00, 0x00, 0xff, 0xff];
    let frame = DepthFrame::from_le_bytes(3, 1, &raw).expect("valid buffer");
    assert_eq!(frame.samples(), &[700, 0, u16::MAX]);
    assert_eq!(frame.get(0, 0), Some(700));
    assert_eq!(frame.get(3, 0), None);
    assert_eq!(frame.get(0, 1), None);
}

#[test]
fn depth_buffer_size_is_checked() {
    assert!(matches!(
        DepthFrame::new(2, 2, vec![1, 2, 3]),
        Err(Error::BufferSizeMismatch {
            expected: 4,
            actual: 3
        })
    ));
    assert!(matches!(
        DepthFrame::from_le_bytes(2, 1, &[1, 2, 3]),
        Err(Error::BufferSizeMismatch {
            expected: 4,
            actual: 3
        })
    ));
}

#[test]
fn bgra_is_swapped_to_rgba() {
    let raw = [1, 2, 3, 4, 10, 20, 30, 40];
    let frame = ColorFrame::from_bgra_bytes(1, 2, &raw).expect("valid buffer");
    assert_eq!(frame.pixels(), &[[3, 2, 1, 4], [30, 20, 10, 40]]);
    assert_eq!(frame.get(0, 1), Some([30, 20, 10, 40]));

    let frame = ColorFrame::from_rgba_bytes(1, 2, &raw).expect("valid buffer");
    assert_eq!(frame.pixels(), &[[1, 2, 3, 4], [10, 20, 30, 40]]);
}

#[test]
fn color_buffer_size_is_checked() {
    assert!(matches!(
        ColorFrame::from_rgba_bytes(2, 2, &[0; 15]),
        Err(Error::BufferSizeMismatch {
            expected: 16,
            actual: 15
        })
    ));
}

#[test]
fn empty_frames_are_allowed() {
    let depth = DepthFrame::new(0, 4, vec![]).expect("empty depth");
    let color = ColorFrame::new(0, 4, vec![]).expect("empty color");
    assert_eq!(depth.pixel_count(), 0);
    assert!(check_dimensions(&depth, &color).is_ok());
}

#[test]
fn dimensions_must_match() {
    let depth = DepthFrame::new(2, 3, vec![0; 6]).unwrap();
    let color = ColorFrame::new(3, 2, vec![[0; 4]; 6]).unwrap();
    assert!(matches!(
        check_dimensions(&depth, &color),
        Err(Error::DimensionMismatch {
            depth_width: 2,
            depth_height: 3,
            color_width: 3,
            color_height: 2
        })
    ));
}
