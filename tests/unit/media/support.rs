use crate::config::GenConfig;
use crate::config::families::CompatClass;
use crate::graph::node::{NodeInputs, NodeRef};
use crate::graph::workflow::{Workflow, WorkflowGraph};
use crate::media::convert::MediaConverter;
use crate::media::handle::{MediaHandle, ModelRef};
use crate::media::kind::MediaKind;

pub(crate) struct Fixture {
    pub(crate) wf: Workflow,
    pub(crate) cfg: GenConfig,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self {
            wf: Workflow::new(),
            cfg: GenConfig::default(),
        }
    }

    pub(crate) fn conv(&mut self) -> MediaConverter<'_> {
        MediaConverter::from_config(&mut self.wf, &self.cfg)
    }

    pub(crate) fn vae(&mut self, family: &str) -> ModelRef {
        let id = self
            .wf
            .create_node("VAELoader", NodeInputs::new(), None)
            .unwrap();
        ModelRef::new(NodeRef::new(id, 0), Some(CompatClass::new(family)))
    }

    pub(crate) fn source(&mut self, kind: MediaKind, family: Option<&str>) -> MediaHandle {
        let id = self
            .wf
            .create_node("LoadSource", NodeInputs::new(), None)
            .unwrap();
        MediaHandle::new(NodeRef::new(id, 0), kind).with_compat(family.map(CompatClass::new))
    }

    pub(crate) fn class_of(&self, r: &NodeRef) -> &str {
        &self.wf.node(&r.node).unwrap().class_type
    }

    pub(crate) fn link(&self, r: &NodeRef, input: &str) -> NodeRef {
        self.wf.node(&r.node).unwrap().link(input).unwrap().clone()
    }
}
