// modbridge_diagnostics/descriptors - Stable diagnostic codes and guidance
/// Descriptor pairing a stable diagnostic code with reviewer guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticDescriptor {
    pub code: &'static str,
    pub title: &'static str,
    pub help: &'static str,
}

pub const PARSE_ERROR: &str = "MB1001";
pub const UNRECOGNIZED_CONSTRUCT: &str = "MB2001";
pub const UNRESOLVED_REFERENCE: &str = "MB2002";
pub const UNMAPPED_API: &str = "MB3001";
pub const UNSUPPORTED_API: &str = "MB3002";
pub const COMPLEX_CONVERSION: &str = "MB3003";
pub const WRAPPER_BRIDGE: &str = "MB3004";
pub const INTERNAL_FAULT: &str = "MB3005";
pub const SIMPLIFIED_CONVERSION: &str = "MB3006";
pub const RUN_CANCELLED: &str = "MB4001";

const DESCRIPTORS: &[DiagnosticDescriptor] = &[
    DiagnosticDescriptor {
        code: PARSE_ERROR,
        title: "Source file could not be fully parsed",
        help: "The remainder of the file was converted from a partial syntax tree. Fix the reported syntax problem and re-run the conversion.",
    },
    DiagnosticDescriptor {
        code: UNRECOGNIZED_CONSTRUCT,
        title: "Declaration does not match a known registration or event idiom",
        help: "Utility classes are expected here and need no action. If this declaration registers content, file the idiom so it can be added to the recognition table.",
    },
    DiagnosticDescriptor {
        code: UNRESOLVED_REFERENCE,
        title: "Handler references a registration that was not found in this mod",
        help: "Check that the referenced identifier is registered in one of the converted files, or register it manually in the generated scripts.",
    },
    DiagnosticDescriptor {
        code: UNMAPPED_API,
        title: "No mapping entry exists for this API at the requested version",
        help: "Add a mapping for the signature, or port the call by hand starting from the emitted stub.",
    },
    DiagnosticDescriptor {
        code: UNSUPPORTED_API,
        title: "The mapping table marks this API as having no equivalent",
        help: "The behavior cannot be expressed in the target scripting API. Redesign this feature or drop it from the ported mod.",
    },
    DiagnosticDescriptor {
        code: COMPLEX_CONVERSION,
        title: "A multi-statement expansion was substituted for this API",
        help: "Complex conversions are heuristic. Review the expanded statements against the original behavior before shipping.",
    },
    DiagnosticDescriptor {
        code: WRAPPER_BRIDGE,
        title: "An adapter call bridges a signature mismatch",
        help: "No action needed; the wrapper reorders or reshapes arguments to fit the target API.",
    },
    DiagnosticDescriptor {
        code: INTERNAL_FAULT,
        title: "The transpiler failed while processing this construct",
        help: "The construct was skipped and the rest of the mod converted. Report this with the construct's source location.",
    },
    DiagnosticDescriptor {
        code: SIMPLIFIED_CONVERSION,
        title: "A simpler, lossy form replaced the full expansion",
        help: "Simplifications were allowed for this run. Compare the simplified output with the full expansion if fidelity matters.",
    },
    DiagnosticDescriptor {
        code: RUN_CANCELLED,
        title: "The conversion run was cancelled before completion",
        help: "Re-run the conversion. Files already converted are complete; no partially-emitted output is produced.",
    },
];

/// Looks up the descriptor for a diagnostic code.
pub fn lookup(code: &str) -> Option<&'static DiagnosticDescriptor> {
    DESCRIPTORS.iter().find(|descriptor| descriptor.code == code)
}
