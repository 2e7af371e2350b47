use super::*;
use crate::{
    assets::decode::PreparedFrame,
    assets::preload::FrameSlot,
    eval::geometry::{DocumentLayout, markers},
    eval::signals::SignalValue,
    foundation::core::SurfaceSize,
};

#[derive(Default)]
struct Recorder {
    drawn: Vec<FrameIndex>,
}

impl FrameSurface for Recorder {
    fn size(&self) -> SurfaceSize {
        SurfaceSize {
            width: 1080,
            height: 1920,
        }
    }

    fn draw_frame(&mut self, index: FrameIndex, _frame: &PreparedFrame) -> ReelResult<()> {
        self.drawn.push(index);
        Ok(())
    }
}

fn full_store(n: usize) -> Arc<FrameStore> {
    let store = Arc::new(FrameStore::new(n));
    for i in 0..n {
        store.settle(
            FrameIndex(i),
            FrameSlot::Loaded(Arc::new(PreparedFrame {
                width: 1,
                height: 1,
                rgba8: Arc::new(vec![0, 0, 0, 255]),
            })),
        );
    }
    store
}

#[test]
fn engine_rejects_mismatched_store() {
    let err = ScrollEngine::new(EngineConfig::reference(), Arc::new(FrameStore::new(3)));
    assert!(err.is_err());
}

#[test]
fn evaluation_is_a_pure_function_of_the_sample() {
    let cfg = EngineConfig::reference();
    let layout = DocumentLayout::reference(800.0);
    let a = layout.sample(900.0, 800.0);
    let b = layout.sample(2100.0, 800.0);

    let first = evaluate_tick(&cfg, &a, &layout);
    let _ = evaluate_tick(&cfg, &b, &layout);
    assert_eq!(evaluate_tick(&cfg, &a, &layout), first);
}

#[test]
fn reference_page_walkthrough() {
    let cfg = EngineConfig::reference();
    let vh = 800.0;
    let layout = DocumentLayout::reference(vh);

    // Top of the page: nothing triggered, logo block and indicator visible.
    let out = evaluate_tick(&cfg, &layout.sample(0.0, vh), &layout);
    assert_eq!(out.frame_index, FrameIndex(0));
    assert!(!out.signals.is_active("logo_pinned"));
    assert!(out.overlays["logo_block"].shown);
    assert!(out.overlays["scroll_indicator"].shown);
    assert!(!out.overlays["badge"].shown);

    // Logo anchor passes the viewport top.
    let out = evaluate_tick(&cfg, &layout.sample(0.4 * vh, vh), &layout);
    assert!(out.signals.is_active("logo_pinned"));

    // Badge trigger top at 300px.
    let out = evaluate_tick(&cfg, &layout.sample(1.0 * vh - 300.0, vh), &layout);
    assert!(out.overlays["badge"].shown);
    assert!(!out.overlays["blue_square"].shown);

    // Square trigger top at 100px: square shown, rings fully turned.
    let out = evaluate_tick(&cfg, &layout.sample(1.5 * vh - 100.0, vh), &layout);
    assert!(out.overlays["blue_square"].shown);
    assert_eq!(out.signals.get("ring_spin"), Some(SignalValue::Progress(1.0)));
    assert_eq!(out.rotations["ring_left"], 180.0);
    assert_eq!(out.rotations["ring_right"], -180.0);

    // Bottom of the page: final logo takes over.
    let out = evaluate_tick(&cfg, &layout.sample(3.0 * vh, vh), &layout);
    assert_eq!(out.frame_index, FrameIndex(149));
    assert!(out.overlays["final_logo"].shown);
    assert!(!out.overlays["logo_block"].shown);
    assert!(!out.overlays["scroll_indicator"].shown);
    assert!(!out.overlays["blue_square"].shown);
}

#[test]
fn on_scroll_sample_draws_selected_frame() {
    let cfg = EngineConfig::reference();
    let layout = DocumentLayout::reference(800.0);
    let mut engine = ScrollEngine::new(cfg, full_store(150)).unwrap();
    let mut surface = Recorder::default();

    let out = engine.on_scroll_sample(&layout.sample(1200.0, 800.0), &layout, &mut surface);
    assert_eq!(out.frame_index, FrameIndex(75));
    assert_eq!(surface.drawn, vec![FrameIndex(75)]);
    assert!(!engine.present_placeholder(&mut surface));
}

#[test]
fn missing_markers_leave_rules_inactive() {
    let cfg = EngineConfig::reference();
    let layout = DocumentLayout::new(3200.0).with_marker(markers::BADGE_TRIGGER, 800.0);
    let out = evaluate_tick(&cfg, &layout.sample(3200.0, 800.0), &layout);
    assert!(!out.signals.is_active("final_logo"));
    assert_eq!(out.signals.progress("ring_spin"), 0.0);
    assert!(out.overlays["logo_block"].shown);
}

/// Frame `ready` loads immediately; every other frame waits until the gate opens.
struct GatedFrames {
    ready: usize,
    open: std::sync::Mutex<bool>,
    opened: std::sync::Condvar,
}

impl GatedFrames {
    fn release(&self) {
        *self.open.lock().unwrap() = true;
        self.opened.notify_all();
    }
}

impl crate::assets::source::FrameSource for GatedFrames {
    fn load(&self, number: usize) -> ReelResult<Vec<u8>> {
        if number != self.ready {
            let mut open = self.open.lock().unwrap();
            while !*open {
                open = self.opened.wait(open).unwrap();
            }
        }
        let v = (number * 10) as u8;
        let mut buf = Vec::new();
        image::RgbaImage::from_raw(1, 1, vec![v, v, v, 255])
            .unwrap()
            .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        Ok(buf)
    }
}

#[test]
fn placeholder_appears_as_soon_as_a_frame_settles() {
    use crate::assets::preload::{PreloadOpts, SlotState, start_preload};

    let source = Arc::new(GatedFrames {
        ready: 3,
        open: std::sync::Mutex::new(false),
        opened: std::sync::Condvar::new(),
    });
    let cfg = EngineConfig {
        frame_count: 4,
        ..EngineConfig::reference()
    };
    let mut preload = start_preload(source.clone(), 4, &PreloadOpts { threads: Some(4) }).unwrap();
    let mut engine = ScrollEngine::new(cfg, preload.store()).unwrap();
    let mut surface = Recorder::default();

    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
    let mut placed = false;
    while !placed {
        assert!(std::time::Instant::now() < deadline, "no frame settled");
        for event in preload.poll() {
            assert_eq!(event.index, FrameIndex(2));
            assert_eq!(event.state, SlotState::Loaded);
            placed = engine.present_placeholder(&mut surface);
        }
        std::thread::sleep(std::time::Duration::from_millis(5));
    }
    assert_eq!(surface.drawn, vec![FrameIndex(2)]);
    assert_eq!(preload.store().state(FrameIndex(0)), SlotState::Pending);

    source.release();
    let stats = preload.wait();
    assert_eq!(stats.loaded, 4);
    assert!(!engine.present_placeholder(&mut surface));
    assert_eq!(surface.drawn, vec![FrameIndex(2)]);
}
