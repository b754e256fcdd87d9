use {
    image::{Frame, FrameAllocator, FrameLocation, Image, PixelFormat, Vec2, encode_jpeg},
    packet::{
        Codec, DecodeContext, DecodeError, DecoderApi, DecoderConfig, HardwareDecode, HwTransfer,
        LegacyDecode, MediaUnit, Ownership, PacketError, Payload, PayloadFlags, SendReceive,
        YuyvDecoder,
    },
};

fn mjpeg_payload(size: Vec2<usize>, value: u8) -> Payload {
    let picture = Image::new(size, vec![value; size.area() * 3], PixelFormat::Rgb8);
    let jpeg = encode_jpeg(&picture, 95).unwrap();
    Payload::new(jpeg).with_flags(PayloadFlags::KEY)
}

fn yuyv_payload(size: Vec2<usize>, y: u8) -> Payload {
    let mut data = Vec::with_capacity(size.area() * 2);
    for _ in 0..size.area() / 2 {
        data.extend_from_slice(&[y, 128, y, 128]);
    }
    Payload::new(data).with_flags(PayloadFlags::KEY)
}

#[test]
fn test_mjpeg_pipeline() {
    base::init_stdout_logger();
    let size = Vec2::new(16, 16);
    let mut context = DecodeContext::open(&DecoderConfig::default()).unwrap();
    assert_eq!(context.strategy_name(), "software");

    let mut buffer = Image::alloc(Vec2::new(1, 1), PixelFormat::Rgb8).unwrap();
    let mut unit = MediaUnit::new();
    unit.set_payload(&mjpeg_payload(size, 128).with_pts(90)).unwrap();
    assert!(unit.is_keyframe());

    unit.decode(&mut context).unwrap();
    let frame = unit.frame().unwrap();
    assert!(frame.is_tracked());
    assert_eq!(frame.size, size);
    assert_eq!(frame.pts, Some(90));
    assert_eq!(context.allocator().live(), 1);

    {
        let image = unit.get_image(Some(&mut buffer)).unwrap();
        assert_eq!(image.size, size);
        assert!(image.data.iter().all(|&v| v.abs_diff(128) <= 4));
    }
    assert_eq!(unit.image_ownership(), Ownership::Borrowed);

    unit.reset();
    assert_eq!(unit.payload().size(), 0);
    assert!(!unit.has_frame());
    assert_eq!(context.allocator().live(), 0);
    assert_eq!(unit.image_ownership(), Ownership::Borrowed);
}

#[test]
fn test_decode_twice_keeps_first_frame() {
    let mut context = DecodeContext::open(&DecoderConfig::default()).unwrap();
    let mut unit = MediaUnit::from_payload(&mjpeg_payload(Vec2::new(8, 8), 50)).unwrap();
    unit.decode(&mut context).unwrap();
    let first = unit.frame().cloned().unwrap();
    let allocated = context.allocator().total_allocated();
    assert_eq!(allocated, 1);

    assert!(matches!(
        unit.decode(&mut context),
        Err(DecodeError::FramePresent)
    ));
    assert_eq!(unit.frame(), Some(&first));
    assert_eq!(context.allocator().total_allocated(), allocated);
}

#[test]
fn test_get_image_is_deterministic() {
    let mut context = DecodeContext::open(&DecoderConfig::default()).unwrap();
    let mut buffer = Image::alloc(Vec2::new(16, 8), PixelFormat::Rgb8).unwrap();
    let mut unit = MediaUnit::from_payload(&mjpeg_payload(Vec2::new(16, 8), 180)).unwrap();
    unit.decode(&mut context).unwrap();

    let first = unit.get_image(Some(&mut buffer)).unwrap().clone();
    let second = unit.get_image(None).unwrap().clone();
    assert_eq!(first, second);
}

#[test]
fn test_gray_image_from_color_frame() {
    let mut context = DecodeContext::open(&DecoderConfig::default()).unwrap();
    let mut buffer = Image::alloc(Vec2::new(8, 8), PixelFormat::Gray8).unwrap();
    let mut unit = MediaUnit::from_payload(&mjpeg_payload(Vec2::new(8, 8), 100)).unwrap();
    unit.decode(&mut context).unwrap();

    let image = unit.get_image(Some(&mut buffer)).unwrap();
    assert_eq!(image.data.len(), 64);
    assert!(image.data.iter().all(|&v| v.abs_diff(100) <= 4));
}

#[test]
fn test_get_image_before_decode() {
    let mut buffer = Image::alloc(Vec2::new(8, 8), PixelFormat::Rgb8).unwrap();
    let mut unit = MediaUnit::from_payload(&mjpeg_payload(Vec2::new(8, 8), 1)).unwrap();
    assert!(matches!(
        unit.get_image(Some(&mut buffer)),
        Err(PacketError::NoFrame)
    ));
    assert_eq!(unit.image_ownership(), Ownership::Absent);
}

#[test]
fn test_corrupt_payload_frees_frame() {
    let mut context = DecodeContext::open(&DecoderConfig::default()).unwrap();
    let payload = Payload::new(vec![0x00, 0x01, 0x02, 0x03]).with_flags(PayloadFlags::KEY);
    let mut unit = MediaUnit::from_payload(&payload).unwrap();

    assert!(matches!(
        unit.decode(&mut context),
        Err(DecodeError::Corrupt(_))
    ));
    assert!(!unit.has_frame());
    assert_eq!(context.allocator().live(), 0);

    // a failed unit does not poison the context
    let mut next = MediaUnit::from_payload(&mjpeg_payload(Vec2::new(8, 8), 9)).unwrap();
    next.decode(&mut context).unwrap();
}

#[test]
fn test_unfilled_payload_is_rejected() {
    let mut context = DecodeContext::open(&DecoderConfig::default()).unwrap();
    let mut unit = MediaUnit::new();
    assert!(matches!(
        unit.decode(&mut context),
        Err(DecodeError::Rejected(_))
    ));
    assert_eq!(context.allocator().live(), 0);
}

#[test]
fn test_legacy_unfilled_payload_is_again() {
    let config = DecoderConfig::default().with_api(DecoderApi::OneShot);
    let mut context = DecodeContext::open(&config).unwrap();
    assert_eq!(context.strategy_name(), "legacy");

    let mut unit = MediaUnit::new();
    let error = unit.decode(&mut context).unwrap_err();
    assert!(error.is_again());
    assert!(!unit.has_frame());
}

#[test]
fn test_legacy_yuyv() {
    let size = Vec2::new(4, 2);
    let config = DecoderConfig::default()
        .with_codec(Codec::Yuyv)
        .with_api(DecoderApi::OneShot)
        .with_size(size);
    let mut context = DecodeContext::open(&config).unwrap();

    let mut buffer = Image::alloc(size, PixelFormat::Rgb8).unwrap();
    let mut unit = MediaUnit::from_payload(&yuyv_payload(size, 128)).unwrap();
    unit.decode(&mut context).unwrap();
    assert_eq!(unit.frame().map(|frame| frame.format), Some(PixelFormat::Yuyv));

    let image = unit.get_image(Some(&mut buffer)).unwrap();
    assert_eq!(image.size, size);
    for pixel in image.data.chunks_exact(3) {
        assert_eq!(pixel[0], pixel[1]);
        assert_eq!(pixel[1], pixel[2]);
    }
}

#[test]
fn test_incomplete_yuyv_is_again() {
    let size = Vec2::new(4, 2);
    let config = DecoderConfig::default()
        .with_codec(Codec::Yuyv)
        .with_api(DecoderApi::OneShot)
        .with_size(size);
    let mut context = DecodeContext::open(&config).unwrap();

    let mut unit = MediaUnit::from_payload(&Payload::new(vec![16u8; 6])).unwrap();
    assert!(matches!(unit.decode(&mut context), Err(DecodeError::Again)));
    assert!(!unit.has_frame());
    assert_eq!(context.allocator().live(), 0);
}

#[test]
fn test_send_receive_short_yuyv_is_corrupt() {
    let config = DecoderConfig::default()
        .with_codec(Codec::Yuyv)
        .with_size(Vec2::new(4, 2));
    let mut context = DecodeContext::open(&config).unwrap();

    let mut unit = MediaUnit::from_payload(&Payload::new(vec![16u8; 6])).unwrap();
    assert!(matches!(
        unit.decode(&mut context),
        Err(DecodeError::Corrupt(_))
    ));
}

#[test]
fn test_allocator_limit() {
    let config = DecoderConfig::default().with_max_frames(1);
    let mut context = DecodeContext::open(&config).unwrap();

    let mut first = MediaUnit::from_payload(&mjpeg_payload(Vec2::new(8, 8), 1)).unwrap();
    first.decode(&mut context).unwrap();

    let mut second = MediaUnit::from_payload(&mjpeg_payload(Vec2::new(8, 8), 2)).unwrap();
    assert!(matches!(
        second.decode(&mut context),
        Err(DecodeError::Allocation(_))
    ));

    drop(first);
    second.decode(&mut context).unwrap();
}

#[test]
fn test_yuyv_needs_size() {
    let config = DecoderConfig::default().with_codec(Codec::Yuyv);
    assert!(matches!(
        DecodeContext::open(&config),
        Err(DecodeError::Config(_))
    ));

    let config = config.with_size(Vec2::new(0, 4));
    assert!(matches!(
        DecodeContext::open(&config),
        Err(DecodeError::Config(_))
    ));
}

#[test]
fn test_oversized_yuyv_size_is_config_error() {
    for api in [DecoderApi::OneShot, DecoderApi::SendReceive] {
        let config = DecoderConfig::default()
            .with_codec(Codec::Yuyv)
            .with_api(api)
            .with_size(Vec2::new(usize::MAX / 2, 2));
        assert!(matches!(
            DecodeContext::open(&config),
            Err(DecodeError::Config(_))
        ));
    }
}

#[test]
fn test_oversized_yuyv_decoder_fails_without_panic() {
    let decoder = YuyvDecoder::new(Vec2::new(usize::MAX / 2, 2));
    assert!(matches!(decoder.frame_bytes(), Err(DecodeError::Config(_))));

    let allocator = FrameAllocator::new();
    let mut context = DecodeContext::with_strategy(LegacyDecode::new(decoder), allocator.clone());
    let mut unit = MediaUnit::from_payload(&yuyv_payload(Vec2::new(4, 2), 128)).unwrap();
    assert!(matches!(
        unit.decode(&mut context),
        Err(DecodeError::Config(_))
    ));
    assert!(!unit.has_frame());
    assert_eq!(allocator.live(), 0);
}

#[test]
fn test_corrupt_flag_is_rejected() {
    let flagged =
        mjpeg_payload(Vec2::new(8, 8), 60).with_flags(PayloadFlags::KEY | PayloadFlags::CORRUPT);
    for api in [DecoderApi::SendReceive, DecoderApi::OneShot] {
        let mut context = DecodeContext::open(&DecoderConfig::default().with_api(api)).unwrap();
        let mut unit = MediaUnit::from_payload(&flagged).unwrap();
        assert!(matches!(
            unit.decode(&mut context),
            Err(DecodeError::Rejected(_))
        ));
        assert!(!unit.has_frame());
        assert_eq!(context.allocator().live(), 0);
    }

    let size = Vec2::new(4, 2);
    let config = DecoderConfig::default()
        .with_codec(Codec::Yuyv)
        .with_api(DecoderApi::OneShot)
        .with_size(size);
    let mut context = DecodeContext::open(&config).unwrap();
    let flagged = yuyv_payload(size, 128).with_flags(PayloadFlags::CORRUPT);
    let mut unit = MediaUnit::from_payload(&flagged).unwrap();
    assert!(matches!(
        unit.decode(&mut context),
        Err(DecodeError::Rejected(_))
    ));
}

#[test]
fn test_hw_accel_falls_back_to_software() {
    let config = DecoderConfig::default().with_hw_accel(true);
    let context = DecodeContext::open(&config).unwrap();
    assert_eq!(context.strategy_name(), "software");
    assert!(!context.is_hw_accelerated());
}

/// Stands in for an accelerator: frames come out device resident.
struct FakeGpu {
    size: Vec2<usize>,
    queued: Option<u8>,
    fail_transfer: bool,
}

impl FakeGpu {
    fn new(size: Vec2<usize>) -> Self {
        Self {
            size,
            queued: None,
            fail_transfer: false,
        }
    }
}

impl SendReceive for FakeGpu {
    fn send_packet(&mut self, payload: &Payload) -> Result<(), DecodeError> {
        self.queued = payload.data().first().copied();
        Ok(())
    }

    fn receive_frame(&mut self, frame: &mut Frame) -> Result<(), DecodeError> {
        let value = self.queued.take().ok_or(DecodeError::Again)?;
        frame
            .reshape(self.size, PixelFormat::Gray8)
            .map_err(|e| DecodeError::Corrupt(e.to_string()))?;
        frame.planes[0].data.fill(value);
        frame.location = FrameLocation::Device;
        Ok(())
    }
}

impl HwTransfer for FakeGpu {
    fn transfer(
        &mut self,
        host: &mut Frame,
        device: &Frame,
        staging: &mut Vec<u8>,
    ) -> Result<(), DecodeError> {
        if self.fail_transfer {
            return Err(DecodeError::Transfer("device lost".to_string()));
        }
        staging.clear();
        staging.extend_from_slice(&device.planes[0].data);
        host.copy_picture_from(device);
        Ok(())
    }
}

#[test]
fn test_hardware_decode_transfers_through_scratch() {
    let size = Vec2::new(4, 4);
    let mut context =
        DecodeContext::with_strategy(HardwareDecode::new(FakeGpu::new(size)), FrameAllocator::new());
    assert!(context.is_hw_accelerated());

    let mut buffer = Image::alloc(size, PixelFormat::Gray8).unwrap();
    let mut unit = MediaUnit::from_payload(&Payload::new(vec![42u8])).unwrap();
    unit.decode(&mut context).unwrap();
    assert!(unit.scratch_len() > 0);
    assert_eq!(unit.frame().map(|frame| frame.location), Some(FrameLocation::Host));

    assert_eq!(unit.get_image(Some(&mut buffer)).unwrap().data, vec![42; 16]);

    unit.reset();
    assert_eq!(unit.scratch_len(), 0);
}

#[test]
fn test_hardware_transfer_failure() {
    let mut gpu = FakeGpu::new(Vec2::new(4, 4));
    gpu.fail_transfer = true;
    let allocator = FrameAllocator::new();
    let mut context = DecodeContext::with_strategy(HardwareDecode::new(gpu), allocator.clone());

    let mut unit = MediaUnit::from_payload(&Payload::new(vec![1u8])).unwrap();
    assert!(matches!(
        unit.decode(&mut context),
        Err(DecodeError::Transfer(_))
    ));
    assert!(!unit.has_frame());
    assert_eq!(allocator.live(), 0);
    assert_eq!(allocator.total_allocated(), 1);
}
