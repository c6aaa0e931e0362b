//! URScript sources for the six door moves.
//!
//! Pick programs carry the `{{GRIP_WIDTH}}` and `{{GRIP_FORCE}}` tokens; storage programs release with a
//! fixed opening and are sent verbatim.

pub const DOOR_1_TO_WORK_TABLE: &str = r#"
def move_door1_to_work_table():
  global RPC = rpc_factory("xmlrpc", "http://localhost:41414")
  global TOOL_INDEX = 0

  def rg_is_busy():
    return RPC.rg_get_busy(TOOL_INDEX)
  end

  def rg_grip(width, force = 10):
    RPC.rg_grip(TOOL_INDEX, width + .0, force + .0)
    sleep(0.01)
    while (rg_is_busy()):
    end
  end

  p1  = p[.121, -.379, .043, 3.2, 0, 0]
  p2  = p[-.02718, -.5, -.0552, 3.175, -0, 0]
  p8  = p[-.02718, -.5, -.115, 3.175, -0, 0]
  p4  = p[.125, -.5607, -.0436, 0, -2.239, 2.175]

  movej(p1)
  rg_grip(80)
  movej(p2)
  rg_grip(80)
  movel(p8)
  rg_grip({{GRIP_WIDTH}}, {{GRIP_FORCE}})
  movel(p2)
  movej(p4)

end

move_door1_to_work_table()
"#;

pub const DOOR_2_TO_WORK_TABLE: &str = r#"
def move_door2_to_work_table():
  global RPC = rpc_factory("xmlrpc", "http://localhost:41414")
  global TOOL_INDEX = 0

  def rg_is_busy():
    return RPC.rg_get_busy(TOOL_INDEX)
  end

  def rg_grip(width, force = 10):
    RPC.rg_grip(TOOL_INDEX, width + .0, force + .0)
    sleep(0.01)
    while (rg_is_busy()):
    end
  end

  p1  = p[.121, -.379, .043, 3.2, 0, 0]
  p2  = p[-.02718, -.5, -.0552, 3.175, -0, 0]
  p9  = p[-.02718, -.5, -.121, 3.175, -0, 0]
  p4  = p[.125, -.5607, -.0436, 0, -2.239, 2.175]

  movej(p1)
  rg_grip(80)
  movej(p2)
  rg_grip(80)
  movel(p9)
  rg_grip({{GRIP_WIDTH}}, {{GRIP_FORCE}})
  movel(p2)
  movej(p4)

end

move_door2_to_work_table()
"#;

pub const DOOR_3_TO_WORK_TABLE: &str = r#"
def move_door3_to_work_table():
  global RPC = rpc_factory("xmlrpc", "http://localhost:41414")
  global TOOL_INDEX = 0

  def rg_is_busy():
    return RPC.rg_get_busy(TOOL_INDEX)
  end

  def rg_grip(width, force = 10):
    RPC.rg_grip(TOOL_INDEX, width + .0, force + .0)
    sleep(0.01)
    while (rg_is_busy()):
    end
  end

  p1  = p[.121, -.379, .043, 3.2, 0, 0]
  p2  = p[-.02718, -.5, -.0552, 3.175, -0, 0]
  p3  = p[-.02718, -.5, -.132, 3.175, -0, 0]
  p4  = p[.125, -.5607, -.0436, 0, -2.239, 2.175]

  movej(p1)
  rg_grip(80)
  movej(p2)
  rg_grip(80)
  movel(p3)
  rg_grip({{GRIP_WIDTH}}, {{GRIP_FORCE}})
  movel(p2)
  movej(p4)

end

move_door3_to_work_table()
"#;

pub const DOOR_1_TO_STORAGE: &str = r#"
def move_door1_to_storage():
  global RPC = rpc_factory("xmlrpc", "http://localhost:41414")
  global TOOL_INDEX = 0

  def rg_is_busy():
    return RPC.rg_get_busy(TOOL_INDEX)
  end

  def rg_grip(width, force = 10):
    RPC.rg_grip(TOOL_INDEX, width + .0, force + .0)
    sleep(0.01)
    while (rg_is_busy()):
    end
  end

  p1  = p[.121, -.379, .043, 3.2, 0, 0]
  p7  = p[.325, -.5607, -.0, 0.02, -2.186, 2.183]
  p6  = p[.325, -.566, -.092, 0.02, -2.186, 2.183]

  movej(p7)
  movel(p6)
  rg_grip(80)
  movej(p7)
  movej(p1)

end

move_door1_to_storage()
"#;

pub const DOOR_2_TO_STORAGE: &str = r#"
def move_door2_to_storage():
  global RPC = rpc_factory("xmlrpc", "http://localhost:41414")
  global TOOL_INDEX = 0

  def rg_is_busy():
    return RPC.rg_get_busy(TOOL_INDEX)
  end

  def rg_grip(width, force = 10):
    RPC.rg_grip(TOOL_INDEX, width + .0, force + .0)
    sleep(0.01)
    while (rg_is_busy()):
    end
  end

  p1  = p[.121, -.379, .043, 3.2, 0, 0]
  p4  = p[.125, -.5607, -.0436, 0, -2.239, 2.175]
  p10 = p[.125, -.532, -.0436, 0, -2.239, 2.175]
  p11 = p[.325, -.532, -.0, 0.02, -2.186, 2.183]
  p12 = p[.325, -.532, -.097, 0.02, -2.186, 2.183]
  p13 = p[.325, -.532, -.0, 0.02, -2.186, 2.183]

  movej(p4)
  movel(p10)
  movel(p11)
  movel(p12)
  rg_grip(80)
  movel(p13)
  movej(p1)

end

move_door2_to_storage()
"#;

pub const DOOR_3_TO_STORAGE: &str = r#"
def move_door3_to_storage():
  global RPC = rpc_factory("xmlrpc", "http://localhost:41414")
  global TOOL_INDEX = 0

  def rg_is_busy():
    return RPC.rg_get_busy(TOOL_INDEX)
  end

  def rg_grip(width, force = 10):
    RPC.rg_grip(TOOL_INDEX, width + .0, force + .0)
    sleep(0.01)
    while (rg_is_busy()):
    end
  end

  p1  = p[.121, -.379, .043, 3.2, 0, 0]
  p4  = p[.125, -.5607, -.0436, 0, -2.239, 2.175]
  p14 = p[.125, -.499, -.0436, 0, -2.239, 2.175]
  p15 = p[.325, -.499, -.0, 0.02, -2.186, 2.183]
  p16 = p[.325, -.499, -.097, 0.02, -2.186, 2.183]
  p17 = p[.325, -.499, -.0, 0.02, -2.186, 2.183]

  movej(p4)
  movel(p14)
  movel(p15)
  movel(p16)
  rg_grip(80)
  movel(p17)
  movej(p1)

end

move_door3_to_storage()
"#;
