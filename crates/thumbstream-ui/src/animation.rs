//! Animation primitives: easing functions, tweens, and the fade animator.

/// Standard easing functions.
///
/// Input `t` is clamped to `[0.0, 1.0]`. Output is the eased value.
pub mod easing {
    /// Linear easing (no acceleration).
    pub fn linear(t: f32) -> f32 {
        t.clamp(0.0, 1.0)
    }

    /// Quadratic ease-out (slow end). Used for thumbnail fades.
    pub fn ease_out_quad(t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        t * (2.0 - t)
    }
}

/// A running animation that interpolates between two values.
#[derive(Debug, Clone)]
pub struct Tween {
    /// Starting value.
    pub start: f32,
    /// Target value.
    pub end: f32,
    /// Total duration in milliseconds.
    pub duration_ms: f32,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: f32,
    /// Easing function to apply.
    pub easing: fn(f32) -> f32,
}

impl Tween {
    /// Create a new tween animation.
    pub fn new(start: f32, end: f32, duration_ms: f32, easing: fn(f32) -> f32) -> Self {
        Self {
            start,
            end,
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
            easing,
        }
    }

    /// Advance by `dt_ms` and return the current interpolated value.
    pub fn tick(&mut self, dt_ms: f32) -> f32 {
        self.elapsed_ms = (self.elapsed_ms + dt_ms.max(0.0)).min(self.duration_ms);
        self.value()
    }

    /// Check if the animation has completed.
    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Current value without advancing time.
    pub fn value(&self) -> f32 {
        let t = if self.duration_ms > 0.0 {
            self.elapsed_ms / self.duration_ms
        } else {
            1.0
        };
        let eased = (self.easing)(t);
        self.start + (self.end - self.start) * eased
    }
}

/// Identity of an animated value. At most one animation runs per tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimTag(pub u64);

/// Drives alpha fades for thumbnail slots.
///
/// The animator never holds a reference to the animated value. Instead
/// [`FadeAnimator::advance`] reports `(tag, value, finished)` and the
/// owner writes the value back.
pub trait FadeAnimator {
    /// Start animating `tag` from `from` to `target`. Replaces any
    /// animation already running for `tag`.
    fn animate(&mut self, tag: AnimTag, from: f32, target: f32, duration_ms: f32);

    /// Stop the animation for `tag`. Returns `true` if one was running.
    fn kill(&mut self, tag: AnimTag) -> bool;

    /// Whether `tag` has an animation in flight.
    fn is_active(&self, tag: AnimTag) -> bool;

    /// Advance every animation by `dt_ms`, reporting each new value.
    /// Finished animations are reported once with `finished == true`
    /// and then dropped.
    fn advance(&mut self, dt_ms: f32, apply: &mut dyn FnMut(AnimTag, f32, bool));

    /// Stop every animation.
    fn clear(&mut self);
}

/// Default [`FadeAnimator`]: a flat set of tweens sharing one easing.
#[derive(Debug)]
pub struct TweenAnimator {
    tweens: Vec<(AnimTag, Tween)>,
    easing: fn(f32) -> f32,
}

impl TweenAnimator {
    pub fn new() -> Self {
        Self::with_easing(easing::ease_out_quad)
    }

    pub fn with_easing(easing: fn(f32) -> f32) -> Self {
        Self {
            tweens: Vec::new(),
            easing,
        }
    }

    /// Number of animations in flight.
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}

impl Default for TweenAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl FadeAnimator for TweenAnimator {
    fn animate(&mut self, tag: AnimTag, from: f32, target: f32, duration_ms: f32) {
        self.kill(tag);
        self.tweens
            .push((tag, Tween::new(from, target, duration_ms, self.easing)));
    }

    fn kill(&mut self, tag: AnimTag) -> bool {
        let before = self.tweens.len();
        self.tweens.retain(|(t, _)| *t != tag);
        self.tweens.len() != before
    }

    fn is_active(&self, tag: AnimTag) -> bool {
        self.tweens.iter().any(|(t, _)| *t == tag)
    }

    fn advance(&mut self, dt_ms: f32, apply: &mut dyn FnMut(AnimTag, f32, bool)) {
        self.tweens.retain_mut(|(tag, tween)| {
            let value = tween.tick(dt_ms);
            let finished = tween.is_finished();
            apply(*tag, value, finished);
            !finished
        });
    }

    fn clear(&mut self) {
        self.tweens.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tween_linear() {
        let mut tw = Tween::new(0.0, 100.0, 100.0, easing::linear);
        assert_eq!(tw.tick(0.0), 0.0);
        assert_eq!(tw.tick(50.0), 50.0);
        assert_eq!(tw.tick(50.0), 100.0);
        assert!(tw.is_finished());
    }

    #[test]
    fn tween_eased() {
        let mut tw = Tween::new(0.0, 100.0, 100.0, easing::ease_out_quad);
        let v = tw.tick(50.0);
        // Past the midpoint already: ease_out_quad(0.5) = 0.75.
        assert!((v - 75.0).abs() < 0.01);
    }

    #[test]
    fn tween_zero_duration_jumps_to_end() {
        let tw = Tween::new(0.0, 1.0, 0.0, easing::linear);
        assert!(tw.is_finished());
        assert_eq!(tw.value(), 1.0);
    }

    #[test]
    fn tween_overshoot_clamps() {
        let mut tw = Tween::new(0.0, 1.0, 10.0, easing::ease_out_quad);
        assert_eq!(tw.tick(1000.0), 1.0);
    }

    #[test]
    fn easing_bounds() {
        assert_eq!(easing::linear(0.0), 0.0);
        assert_eq!(easing::linear(1.0), 1.0);
        assert_eq!(easing::ease_out_quad(0.0), 0.0);
        assert_eq!(easing::ease_out_quad(1.0), 1.0);
        assert_eq!(easing::ease_out_quad(2.0), 1.0);
    }

    #[test]
    fn animator_reports_until_finished() {
        let mut anim = TweenAnimator::with_easing(easing::linear);
        let tag = AnimTag(7);
        anim.animate(tag, 0.0, 1.0, 100.0);
        assert!(anim.is_active(tag));

        let mut seen = Vec::new();
        anim.advance(50.0, &mut |t, v, done| seen.push((t, v, done)));
        assert_eq!(seen, vec![(tag, 0.5, false)]);

        seen.clear();
        anim.advance(50.0, &mut |t, v, done| seen.push((t, v, done)));
        assert_eq!(seen, vec![(tag, 1.0, true)]);
        assert!(!anim.is_active(tag));
        assert!(anim.is_empty());
    }

    #[test]
    fn animate_replaces_existing_tag() {
        let mut anim = TweenAnimator::new();
        anim.animate(AnimTag(1), 0.0, 1.0, 100.0);
        anim.animate(AnimTag(1), 0.0, 1.0, 100.0);
        assert_eq!(anim.len(), 1);
    }

    #[test]
    fn kill_is_idempotent() {
        let mut anim = TweenAnimator::new();
        anim.animate(AnimTag(3), 0.0, 1.0, 100.0);
        assert!(anim.kill(AnimTag(3)));
        assert!(!anim.kill(AnimTag(3)));
        assert!(!anim.kill(AnimTag(99)));
    }

    #[test]
    fn kill_leaves_other_tags_running() {
        let mut anim = TweenAnimator::new();
        anim.animate(AnimTag(1), 0.0, 1.0, 100.0);
        anim.animate(AnimTag(2), 0.0, 1.0, 100.0);
        anim.kill(AnimTag(1));
        assert!(!anim.is_active(AnimTag(1)));
        assert!(anim.is_active(AnimTag(2)));
    }

    #[test]
    fn clear_stops_everything() {
        let mut anim = TweenAnimator::new();
        for i in 0..5 {
            anim.animate(AnimTag(i), 0.0, 1.0, 100.0);
        }
        anim.clear();
        let mut calls = 0;
        anim.advance(10.0, &mut |_, _, _| calls += 1);
        assert_eq!(calls, 0);
    }
}
