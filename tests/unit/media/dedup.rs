use super::*;
use crate::graph::node::{NodeInputs, inputs};
use crate::graph::workflow::Workflow;

fn seeded() -> (Workflow, NodeRef, NodeRef) {
    let mut wf = Workflow::new();
    let vae = wf.create_node("VAELoader", NodeInputs::new(), None).unwrap();
    let img = wf.create_node("LoadImage", NodeInputs::new(), None).unwrap();
    (wf, NodeRef::new(vae, 0), NodeRef::new(img, 0))
}

#[test]
fn encode_is_cancelled_by_matching_decode() {
    let (mut wf, vae, img) = seeded();
    let enc = wf
        .create_node(
            class::VAE_ENCODE,
            inputs([("vae", (&vae).into()), ("pixels", (&img).into())]),
            None,
        )
        .unwrap();
    let latent = NodeRef::new(enc, 0);

    assert_eq!(
        cancel_inverse(&wf, &latent, VISUAL_ENCODE_OPS, &vae),
        Some(img)
    );
}

#[test]
fn different_model_location_does_not_cancel() {
    let (mut wf, vae, img) = seeded();
    let other_vae = NodeRef::new(
        wf.create_node("VAELoader", NodeInputs::new(), None).unwrap(),
        0,
    );
    let enc = wf
        .create_node(
            class::VAE_ENCODE,
            inputs([("vae", (&vae).into()), ("pixels", (&img).into())]),
            None,
        )
        .unwrap();

    assert_eq!(
        cancel_inverse(&wf, &NodeRef::new(enc, 0), VISUAL_ENCODE_OPS, &other_vae),
        None
    );
}

#[test]
fn unrelated_producer_or_slot_does_not_cancel() {
    let (mut wf, vae, img) = seeded();
    assert_eq!(cancel_inverse(&wf, &img, VISUAL_ENCODE_OPS, &vae), None);

    let enc = wf
        .create_node(
            class::VAE_ENCODE,
            inputs([("vae", (&vae).into()), ("pixels", (&img).into())]),
            None,
        )
        .unwrap();
    assert_eq!(
        cancel_inverse(&wf, &NodeRef::new(enc.clone(), 1), VISUAL_ENCODE_OPS, &vae),
        None
    );
    // Audio tables never match image encoders.
    assert_eq!(
        cancel_inverse(&wf, &NodeRef::new(enc, 0), AUDIO_ENCODE_OPS, &vae),
        None
    );
}

#[test]
fn joint_parts_come_from_concat_producer() {
    let mut wf = Workflow::new();
    let video = NodeRef::new("20", 0);
    let audio = NodeRef::new("21", 0);
    let concat = wf
        .create_node(
            class::LTXV_CONCAT_AV_LATENT,
            inputs([
                ("video_latent", (&video).into()),
                ("audio_latent", (&audio).into()),
            ]),
            None,
        )
        .unwrap();

    assert_eq!(
        find_joint_parts(&wf, &NodeRef::new(concat, 0)),
        Some((video, audio))
    );
}

#[test]
fn joint_parts_reuse_existing_separation() {
    let mut wf = Workflow::new();
    let joint = NodeRef::new("9", 0);
    assert_eq!(find_joint_parts(&wf, &joint), None);

    let sep = wf
        .create_node(
            class::LTXV_SEPARATE_AV_LATENT,
            inputs([("av_latent", (&joint).into())]),
            None,
        )
        .unwrap();
    assert_eq!(
        find_joint_parts(&wf, &joint),
        Some((NodeRef::new(sep.clone(), 0), NodeRef::new(sep, 1)))
    );
}
