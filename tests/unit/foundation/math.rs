use super::*;

#[test]
fn fnv_hash_is_stable_across_chunking() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"thumbkit");
    let mut b = Fnv1a64::new_default();
    b.write_bytes(b"thumb");
    b.write_bytes(b"kit");
    assert_eq!(a.finish(), b.finish());

    let mut c = Fnv1a64::new_default();
    c.write_u32(1280);
    assert_ne!(c.finish(), Fnv1a64::new_default().finish());
}

#[test]
fn unpremultiply_handles_extremes() {
    assert_eq!(unpremultiply_rgba8([0, 0, 0, 0]), [0, 0, 0, 0]);
    assert_eq!(unpremultiply_rgba8([10, 20, 30, 255]), [10, 20, 30, 255]);
    assert_eq!(unpremultiply_rgba8([64, 0, 128, 128]), [128, 0, 255, 128]);
}
