use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub index: usize,
    pub occupant: Option<usize>,
    pub label: Option<String>,
}

impl Frame {
    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }
}

/// Physical memory, tracked per frame rather than per byte.
#[derive(Clone, Debug)]
pub struct Ram<const FRAME_COUNT: usize> {
    frames: [Frame; FRAME_COUNT],
}

impl<const FRAME_COUNT: usize> Default for Ram<FRAME_COUNT> {
    fn default() -> Self {
        Ram::new()
    }
}

impl<const FRAME_COUNT: usize> Ram<FRAME_COUNT> {
    pub fn new() -> Self {
        Ram {
            frames: std::array::from_fn(|index| Frame {
                index,
                occupant: None,
                label: None,
            }),
        }
    }

    /// Lowest-numbered free frame.
    pub fn first_free(&self) -> Option<usize> {
        self.frames.iter().position(Frame::is_free)
    }

    pub fn is_full(&self) -> bool {
        self.first_free().is_none()
    }

    pub fn load(&mut self, frame_idx: usize, page_number: usize, label: String) {
        if let Some(frame) = self.frames.get_mut(frame_idx) {
            frame.occupant = Some(page_number);
            frame.label = Some(label);
        }
    }

    /// Frees the frame and returns the page that was in it.
    pub fn evict(&mut self, frame_idx: usize) -> Option<usize> {
        let frame = self.frames.get_mut(frame_idx)?;

        frame.label = None;
        frame.occupant.take()
    }

    pub fn frame_of(&self, page_number: usize) -> Option<usize> {
        self.frames
            .iter()
            .position(|f| f.occupant == Some(page_number))
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        FRAME_COUNT
    }

    pub fn is_empty(&self) -> bool {
        FRAME_COUNT == 0
    }
}
